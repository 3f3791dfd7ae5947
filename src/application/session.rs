use crate::application::config::VisualizationConfig;
use crate::application::frame_renderer::{FrameRenderer, MarkerSurface};
use crate::application::region_flash::RegionFlashLayer;
use crate::application::timeline::{TimelineFrame, TimelineLayout};
use crate::domain::geography::{Projection, RegionIndex};
use crate::domain::logging::LogComponent;
use crate::domain::playback::{ClockState, PlaybackClock, ScrubCommit, ScrubGesture, ScrubPreview, Scrubber};
use crate::domain::trades::{BucketKey, MinuteHistogram, TradeEventIndex};
use crate::view_state::ViewLayout;
use crate::{log_debug, log_info, log_warn};
use serde::Serialize;

/// Outcome of one playback tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TickReport {
    pub emitted: Option<BucketKey>,
    /// Buckets the tick covered; a fixed-step tick can pass several.
    pub buckets: usize,
    pub spawned: usize,
    pub flashed: usize,
    pub finished: bool,
}

impl TickReport {
    /// Whether the tick put anything on screen that needs animating.
    pub fn needs_frames(&self) -> bool {
        self.spawned > 0 || self.flashed > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: ClockState,
    pub current: Option<BucketKey>,
    pub progress: f64,
    pub active_markers: usize,
    pub flashing_regions: usize,
    pub spawned_total: u64,
    pub total_events: usize,
    pub bucket_count: usize,
}

/// One running visualization: the loaded data, the playback cursor, the live
/// markers and the timeline gesture state. Timer and frame scheduling live
/// outside; they call into `on_tick`, `on_frame` and the pointer handlers.
pub struct VisualizationSession {
    index: TradeEventIndex,
    histogram: MinuteHistogram,
    projection: Projection,
    layout: ViewLayout,
    config: VisualizationConfig,
    clock: PlaybackClock,
    renderer: FrameRenderer,
    flashes: Option<RegionFlashLayer>,
    timeline: Option<TimelineLayout>,
    gesture: ScrubGesture,
    torn_down: bool,
}

impl VisualizationSession {
    pub fn new(
        index: TradeEventIndex,
        histogram: MinuteHistogram,
        projection: Projection,
        layout: ViewLayout,
        config: VisualizationConfig,
    ) -> Self {
        let clock = PlaybackClock::new(index.keys().to_vec(), config.playback.advance_mode())
            .starting_at(index.initial_key());
        let renderer = FrameRenderer::new(config.renderer.clone());
        let track_width = layout.padded_width;
        let (timeline, gesture) = Self::timeline_parts(&index, &histogram, &config, track_width);

        Self {
            index,
            histogram,
            projection,
            layout,
            config,
            clock,
            renderer,
            flashes: None,
            timeline,
            gesture,
            torn_down: false,
        }
    }

    /// Resizes the timeline track, e.g. to the projected map width.
    pub fn with_track_width(mut self, track_width: f64) -> Self {
        let (timeline, gesture) =
            Self::timeline_parts(&self.index, &self.histogram, &self.config, track_width);
        self.timeline = timeline;
        self.gesture = gesture;
        self
    }

    /// Enables state flashes when the renderer config asks for them.
    pub fn with_regions(mut self, regions: RegionIndex) -> Self {
        self.flashes = match self.config.renderer.region_flash.clone() {
            Some(style) if !regions.is_empty() => Some(RegionFlashLayer::new(style, regions)),
            _ => None,
        };
        self
    }

    fn timeline_parts(
        index: &TradeEventIndex,
        histogram: &MinuteHistogram,
        config: &VisualizationConfig,
        track_width: f64,
    ) -> (Option<TimelineLayout>, ScrubGesture) {
        let range = index.min_key().zip(index.max_key());
        let timeline = range.map(|(start, end)| {
            TimelineLayout::new(track_width, histogram, start, end, config.timeline.clone())
        });
        let time_range = range.map(|(start, end)| (start.as_f64(), end.as_f64())).unwrap_or_default();
        let gesture =
            ScrubGesture::new(Scrubber::new(track_width), time_range, config.scrub.debounce_ms);
        (timeline, gesture)
    }

    /// Begins playback. `false` when there is nothing to play.
    pub fn start(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        if self.clock.is_empty() {
            log_warn!(
                LogComponent::Application("VisualizationSession"),
                "No trade buckets to play back"
            );
            return false;
        }
        let started = self.clock.start();
        if started {
            log_info!(
                LogComponent::Application("VisualizationSession"),
                "Playing {} trades across {} buckets",
                self.index.total_events(),
                self.index.bucket_count()
            );
        }
        started
    }

    /// Finished → playing again from the first bucket.
    pub fn restart(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let restarted = self.clock.restart();
        if restarted {
            self.clear_visuals();
        }
        restarted
    }

    pub fn on_tick(&mut self, now: f64) -> TickReport {
        if self.torn_down {
            return TickReport::default();
        }
        let emitted = self.clock.tick();
        let (buckets, spawned, flashed) = match emitted {
            Some(_) => self.show_emitted(now),
            None => (0, 0, 0),
        };
        let finished = self.clock.state() == ClockState::Finished;
        if finished {
            log_debug!(
                LogComponent::Application("VisualizationSession"),
                "Playback finished with {} markers still fading",
                self.renderer.active_count()
            );
        }
        TickReport { emitted, buckets, spawned, flashed, finished }
    }

    /// Spawns every bucket the last emission covered.
    fn show_emitted(&mut self, now: f64) -> (usize, usize, usize) {
        let keys = self.clock.last_emitted_keys();
        let (mut spawned, mut flashed) = (0, 0);
        for key in keys {
            let events = self.index.events_at(*key);
            spawned += self.renderer.spawn_bucket(events, &self.projection, now);
            if let Some(flashes) = self.flashes.as_mut() {
                flashed += flashes.trigger(events, now);
            }
        }
        (keys.len(), spawned, flashed)
    }

    fn clear_visuals(&mut self) {
        self.renderer.clear();
        if let Some(flashes) = self.flashes.as_mut() {
            flashes.clear();
        }
    }

    /// Draws one animation frame. `true` while markers or flashes remain.
    pub fn on_frame(&mut self, now: f64, surface: &mut dyn MarkerSurface) -> bool {
        if self.torn_down {
            return false;
        }
        let fills = self.flashes.as_mut().map(|flashes| flashes.advance(now)).unwrap_or_default();
        self.renderer.render_frame_with_regions(now, &fills, surface)
    }

    pub fn timeline_frame(&self) -> Option<TimelineFrame> {
        let timeline = self.timeline.as_ref()?;
        Some(timeline.frame(self.clock.current()?, self.gesture.preview()))
    }

    pub fn pointer_down(&mut self, x: f64) -> Option<ScrubPreview> {
        if self.torn_down || self.clock.is_empty() {
            return None;
        }
        Some(self.gesture.pointer_down(x))
    }

    pub fn pointer_move(&mut self, x: f64, now: f64) -> Option<ScrubPreview> {
        if self.torn_down {
            return None;
        }
        self.gesture.pointer_move(x, now)
    }

    /// Ends a drag, seeking immediately. Returns the bucket landed on.
    pub fn pointer_up(&mut self, x: f64, now: f64) -> Option<BucketKey> {
        if self.torn_down {
            return None;
        }
        let commit = self.gesture.pointer_up(x)?;
        self.apply_commit(commit, now)
    }

    /// Click on the track: the seek happens once the debounce settles.
    pub fn click(&mut self, x: f64, now: f64) -> Option<ScrubPreview> {
        if self.torn_down || self.clock.is_empty() {
            return None;
        }
        Some(self.gesture.click(x, now))
    }

    /// Applies a settled debounced scrub, if one is due.
    pub fn poll_scrub(&mut self, now: f64) -> Option<BucketKey> {
        if self.torn_down {
            return None;
        }
        let commit = self.gesture.poll(now)?;
        self.apply_commit(commit, now)
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// When the next debounced scrub becomes due.
    pub fn scrub_deadline(&self) -> Option<f64> {
        self.gesture.pending_deadline()
    }

    fn apply_commit(&mut self, commit: ScrubCommit, now: f64) -> Option<BucketKey> {
        self.seek_fraction(commit.fraction, now)
    }

    /// Jumps to the bucket nearest `fraction` of the range and shows only its trades.
    pub fn seek_fraction(&mut self, fraction: f64, now: f64) -> Option<BucketKey> {
        if self.torn_down {
            return None;
        }
        let key = self.clock.seek_fraction(fraction)?;
        self.clear_visuals();
        let (_, spawned, _) = self.show_emitted(now);
        log_debug!(
            LogComponent::Application("VisualizationSession"),
            "Seek to {} ({} markers)",
            key,
            spawned
        );
        Some(key)
    }

    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.clear_visuals();
        self.gesture.reset();
        self.torn_down = true;
        log_debug!(LogComponent::Application("VisualizationSession"), "Session torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.clock.state(),
            current: self.clock.current(),
            progress: self.clock.progress(),
            active_markers: self.renderer.active_count(),
            flashing_regions: self.flashes.as_ref().map_or(0, RegionFlashLayer::active_count),
            spawned_total: self.renderer.spawned_total(),
            total_events: self.index.total_events(),
            bucket_count: self.index.bucket_count(),
        }
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn region_flashes(&self) -> Option<&RegionFlashLayer> {
        self.flashes.as_ref()
    }

    pub fn index(&self) -> &TradeEventIndex {
        &self.index
    }

    pub fn histogram(&self) -> &MinuteHistogram {
        &self.histogram
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }
}
