use crate::domain::logging::LogComponent;
use crate::domain::trades::{BucketKey, nearest_key};
use crate::log_debug;
use serde::Serialize;
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum ClockState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// How the cursor moves on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvanceMode {
    /// Next key in the sorted key list.
    #[default]
    NextKey,
    /// Constant increment in milliseconds; emitted times may hold no events.
    /// Each tick covers every key passed since the previous one, and the last
    /// tick lands on the final key.
    FixedStep(u64),
}

/// Snapshot of the cursor and the range it moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub current: BucketKey,
    pub start: BucketKey,
    pub end: BucketKey,
}

/// Cursor over the sorted bucket keys.
///
/// `tick` emits the current key once, then advances before each further
/// emission. Passing the last key moves the clock to `Finished`. An empty key
/// list yields a clock that stays `Idle` and ignores every call.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    keys: Vec<BucketKey>,
    mode: AdvanceMode,
    state: ClockState,
    initial: BucketKey,
    current: BucketKey,
    /// Exclusive lower bound of the span the last emission covered; `None`
    /// when it covered only `current`.
    previous: Option<BucketKey>,
    emitted: bool,
}

impl PlaybackClock {
    /// `keys` must be sorted and distinct, as produced by the trade index.
    pub fn new(keys: Vec<BucketKey>, mode: AdvanceMode) -> Self {
        let mode = match mode {
            AdvanceMode::FixedStep(0) => AdvanceMode::FixedStep(1),
            other => other,
        };
        let current = keys.first().copied().unwrap_or_default();
        Self {
            keys,
            mode,
            state: ClockState::Idle,
            initial: current,
            current,
            previous: None,
            emitted: false,
        }
    }

    /// Opens (and restarts) playback at `key` instead of the first key. Keys
    /// not in the list are ignored.
    pub fn starting_at(mut self, key: Option<BucketKey>) -> Self {
        if let Some(key) = key.filter(|key| self.keys.binary_search(key).is_ok()) {
            self.initial = key;
            if !self.emitted {
                self.current = key;
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn mode(&self) -> AdvanceMode {
        self.mode
    }

    pub fn keys(&self) -> &[BucketKey] {
        &self.keys
    }

    pub fn start_key(&self) -> Option<BucketKey> {
        self.keys.first().copied()
    }

    pub fn end_key(&self) -> Option<BucketKey> {
        self.keys.last().copied()
    }

    pub fn current(&self) -> Option<BucketKey> {
        (!self.is_empty()).then_some(self.current)
    }

    pub fn snapshot(&self) -> Option<PlaybackState> {
        Some(PlaybackState {
            current: self.current()?,
            start: self.start_key()?,
            end: self.end_key()?,
        })
    }

    /// Idle → Running. Anything else is left alone.
    pub fn start(&mut self) -> bool {
        if self.is_empty() || self.state != ClockState::Idle {
            return false;
        }
        self.state = ClockState::Running;
        log_debug!(LogComponent::Domain("PlaybackClock"), "Playback started at {}", self.current);
        true
    }

    /// Finished → Running from the opening key.
    pub fn restart(&mut self) -> bool {
        if self.is_empty() || self.state != ClockState::Finished {
            return false;
        }
        self.current = self.initial;
        self.previous = None;
        self.emitted = false;
        self.state = ClockState::Running;
        true
    }

    pub fn tick(&mut self) -> Option<BucketKey> {
        if self.state != ClockState::Running {
            return None;
        }
        if self.emitted {
            match self.next_time() {
                Some(next) => {
                    self.previous = Some(self.current);
                    self.current = next;
                }
                None => {
                    self.state = ClockState::Finished;
                    log_debug!(
                        LogComponent::Domain("PlaybackClock"),
                        "Playback finished at {}",
                        self.current
                    );
                    return None;
                }
            }
        }
        self.emitted = true;
        Some(self.current)
    }

    fn next_time(&self) -> Option<BucketKey> {
        let end = self.end_key()?;
        match self.mode {
            AdvanceMode::NextKey => {
                let position = self.keys.partition_point(|key| *key <= self.current);
                self.keys.get(position).copied()
            }
            AdvanceMode::FixedStep(step) => {
                if self.current >= end {
                    return None;
                }
                let next = self.current.value().saturating_add(step).min(end.value());
                Some(BucketKey::from(next))
            }
        }
    }

    /// Keys covered by the last emission: the keys after the previous time up
    /// to and including the current one. In `NextKey` mode this is just the
    /// current key; a `FixedStep` tick may cover several keys or none.
    pub fn last_emitted_keys(&self) -> &[BucketKey] {
        if !self.emitted {
            return &[];
        }
        let upper = self.keys.partition_point(|key| *key <= self.current);
        let lower = match self.previous {
            Some(previous) => self.keys.partition_point(|key| *key <= previous),
            None => self.keys.partition_point(|key| *key < self.current),
        };
        &self.keys[lower.min(upper)..upper]
    }

    /// Time at `fraction` of the range; `fraction` is clamped to `[0, 1]`.
    pub fn time_at_fraction(&self, fraction: f64) -> Option<f64> {
        let start = self.start_key()?.as_f64();
        let end = self.end_key()?.as_f64();
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        Some(start + (end - start) * fraction)
    }

    /// Jump to the key nearest `fraction` of the range. The state is unchanged
    /// and the key counts as emitted, so the next tick moves past it.
    pub fn seek_fraction(&mut self, fraction: f64) -> Option<BucketKey> {
        let time = self.time_at_fraction(fraction)?;
        self.seek_time(time)
    }

    pub fn seek_time(&mut self, time: f64) -> Option<BucketKey> {
        let key = nearest_key(&self.keys, time)?;
        self.current = key;
        self.previous = None;
        self.emitted = true;
        Some(key)
    }

    /// Position of the cursor within the range, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        match (self.start_key(), self.end_key()) {
            (Some(start), Some(end)) if end > start => {
                let span = end.as_f64() - start.as_f64();
                ((self.current.as_f64() - start.as_f64()) / span).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(keys: &[u64], mode: AdvanceMode) -> PlaybackClock {
        PlaybackClock::new(keys.iter().copied().map(BucketKey::from).collect(), mode)
    }

    #[test]
    fn idle_clock_does_not_tick() {
        let mut clock = clock(&[10, 20], AdvanceMode::NextKey);
        assert_eq!(clock.tick(), None);
        assert_eq!(clock.state(), ClockState::Idle);
    }

    #[test]
    fn zero_step_is_bumped_to_one() {
        let clock = clock(&[10, 20], AdvanceMode::FixedStep(0));
        assert_eq!(clock.mode(), AdvanceMode::FixedStep(1));
    }

    #[test]
    fn fixed_step_covers_skipped_keys() {
        let mut clock = clock(&[0, 1500, 1700, 2500], AdvanceMode::FixedStep(1000));
        clock.start();
        let mut covered = Vec::new();
        while clock.tick().is_some() {
            covered.push(clock.last_emitted_keys().iter().map(|key| key.value()).collect::<Vec<_>>());
        }
        assert_eq!(covered, vec![vec![0], vec![], vec![1500, 1700], vec![2500]]);
    }

    #[test]
    fn opening_key_is_used_for_start_and_restart() {
        let mut clock = clock(&[0, 60_000, 120_000], AdvanceMode::NextKey)
            .starting_at(Some(BucketKey::from(60_000)));
        clock.start();
        assert_eq!(clock.tick(), Some(BucketKey::from(60_000)));
        while clock.tick().is_some() {}
        assert!(clock.restart());
        assert_eq!(clock.tick(), Some(BucketKey::from(60_000)));
        assert_eq!(clock.start_key(), Some(BucketKey::from(0)));
    }

    #[test]
    fn state_names() {
        assert_eq!(ClockState::Finished.to_string(), "finished");
    }
}
