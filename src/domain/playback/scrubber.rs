use serde::Serialize;

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Maps pointer x positions on the timeline track to fractions and times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrubber {
    track_width: f64,
}

impl Scrubber {
    pub fn new(track_width: f64) -> Self {
        Self { track_width: track_width.max(0.0) }
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Position on the track as a fraction in `[0, 1]`.
    pub fn fraction_at(&self, x: f64) -> f64 {
        if self.track_width <= 0.0 {
            return 0.0;
        }
        clamp_unit(x / self.track_width)
    }

    pub fn handle_x(&self, fraction: f64) -> f64 {
        clamp_unit(fraction) * self.track_width
    }

    pub fn time_at(&self, fraction: f64, start: f64, end: f64) -> f64 {
        start + (end - start) * clamp_unit(fraction)
    }
}

/// Holds the most recent value until `quiet_ms` pass without a newer one.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_ms: f64) -> Self {
        Self { quiet_ms: quiet_ms.max(0.0), pending: None }
    }

    pub fn quiet_ms(&self) -> f64 {
        self.quiet_ms
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn schedule(&mut self, value: T, now: f64) {
        self.pending = Some((value, now + self.quiet_ms));
    }

    pub fn poll(&mut self, now: f64) -> Option<T> {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.flush()
        } else {
            None
        }
    }

    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Visual-only update while dragging: no data is touched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrubPreview {
    pub fraction: f64,
    pub handle_x: f64,
    pub time: f64,
}

/// A settled scrub that should seek the clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrubCommit {
    pub fraction: f64,
}

/// Drag and click handling for the timeline handle.
///
/// Dragging only produces previews and keeps a debounced commit pending;
/// releasing the pointer commits right away. A click on the track goes
/// through the debouncer.
#[derive(Debug, Clone)]
pub struct ScrubGesture {
    scrubber: Scrubber,
    range: (f64, f64),
    debouncer: Debouncer<f64>,
    dragging: bool,
    preview: Option<ScrubPreview>,
}

impl ScrubGesture {
    pub fn new(scrubber: Scrubber, range: (f64, f64), debounce_ms: f64) -> Self {
        Self {
            scrubber,
            range,
            debouncer: Debouncer::new(debounce_ms),
            dragging: false,
            preview: None,
        }
    }

    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Latest preview of an unfinished drag.
    pub fn preview(&self) -> Option<ScrubPreview> {
        self.preview
    }

    pub fn pending_deadline(&self) -> Option<f64> {
        self.debouncer.deadline()
    }

    fn preview_at(&self, x: f64) -> ScrubPreview {
        let fraction = self.scrubber.fraction_at(x);
        ScrubPreview {
            fraction,
            handle_x: self.scrubber.handle_x(fraction),
            time: self.scrubber.time_at(fraction, self.range.0, self.range.1),
        }
    }

    pub fn pointer_down(&mut self, x: f64) -> ScrubPreview {
        let preview = self.preview_at(x);
        self.dragging = true;
        self.preview = Some(preview);
        preview
    }

    /// `None` unless a drag is in progress.
    pub fn pointer_move(&mut self, x: f64, now: f64) -> Option<ScrubPreview> {
        if !self.dragging {
            return None;
        }
        let preview = self.preview_at(x);
        self.preview = Some(preview);
        self.debouncer.schedule(preview.fraction, now);
        Some(preview)
    }

    /// Ends the drag and commits at once, dropping any pending commit.
    pub fn pointer_up(&mut self, x: f64) -> Option<ScrubCommit> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.preview = None;
        self.debouncer.cancel();
        Some(ScrubCommit { fraction: self.scrubber.fraction_at(x) })
    }

    /// Schedules a debounced commit; returns the handle preview to draw now.
    pub fn click(&mut self, x: f64, now: f64) -> ScrubPreview {
        let preview = self.preview_at(x);
        self.debouncer.schedule(preview.fraction, now);
        preview
    }

    pub fn poll(&mut self, now: f64) -> Option<ScrubCommit> {
        self.debouncer.poll(now).map(|fraction| ScrubCommit { fraction })
    }

    pub fn reset(&mut self) {
        self.dragging = false;
        self.preview = None;
        self.debouncer.cancel();
    }
}
