use crate::application::config::TimelineConfig;
use crate::domain::playback::ScrubPreview;
use crate::domain::screen::ScreenRect;
use crate::domain::trades::{BucketKey, MinuteHistogram, minute_span};
use crate::time_utils::{format_hour_minute, format_hour_minute_second};
use serde::Serialize;

/// One histogram bar, positioned along the track. Bars grow upward from the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineBar {
    pub minute: BucketKey,
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything the timeline surface needs for one redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    pub track: ScreenRect,
    pub progress_width: f64,
    pub bars: Vec<TimelineBar>,
    pub handle_x: f64,
    pub handle_radius: f64,
    pub start_label: String,
    pub end_label: String,
    pub current_label: String,
    pub dragging: bool,
}

pub trait TimelineSurface {
    fn draw_timeline(&mut self, frame: &TimelineFrame);
}

/// Static geometry of the timeline; only the revealed bar count and the
/// handle change between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    track_width: f64,
    start: BucketKey,
    end: BucketKey,
    bars: Vec<TimelineBar>,
    config: TimelineConfig,
}

impl TimelineLayout {
    pub fn new(
        track_width: f64,
        histogram: &MinuteHistogram,
        start: BucketKey,
        end: BucketKey,
        config: TimelineConfig,
    ) -> Self {
        let track_width = track_width.max(0.0);
        let pad = config.histogram_padding;
        let span_ms = end.as_f64() - start.as_f64();
        let bar_width = (track_width - 2.0 * pad).max(0.0) / minute_span(start, end) as f64;
        let max_count = f64::from(histogram.max_count());

        let bars = histogram
            .iter()
            .map(|(minute, count)| {
                let offset = if span_ms > 0.0 {
                    (minute.as_f64() - start.as_f64()) / span_ms
                } else {
                    0.0
                };
                TimelineBar {
                    minute,
                    x: offset * (track_width - 2.0 * pad) + pad,
                    width: (bar_width - 1.0).max(1.0),
                    height: if max_count > 0.0 {
                        f64::from(count) / max_count * config.max_bar_height
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        Self { track_width, start, end, bars, config }
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    pub fn bars(&self) -> &[TimelineBar] {
        &self.bars
    }

    fn progress_of(&self, time: f64) -> f64 {
        let span = self.end.as_f64() - self.start.as_f64();
        if span <= 0.0 {
            return 0.0;
        }
        ((time - self.start.as_f64()) / span).clamp(0.0, 1.0)
    }

    /// Bars for every minute up to and including the one holding `current`.
    pub fn revealed_bars(&self, current: BucketKey) -> &[TimelineBar] {
        let minute = current.minute();
        let count = self.bars.partition_point(|bar| bar.minute <= minute);
        &self.bars[..count]
    }

    /// While a drag preview is active, the handle and current label follow
    /// the pointer; the progress bar and bars stay on the clock.
    pub fn frame(&self, current: BucketKey, preview: Option<ScrubPreview>) -> TimelineFrame {
        let offset = self.config.utc_offset_minutes;
        let progress_width = self.track_width * self.progress_of(current.as_f64());
        let (handle_x, label_time) = match preview {
            Some(preview) => (preview.handle_x, preview.time),
            None => (progress_width, current.as_f64()),
        };

        TimelineFrame {
            track: ScreenRect::new(0.0, 0.0, self.track_width, self.config.track_height),
            progress_width,
            bars: self.revealed_bars(current).to_vec(),
            handle_x,
            handle_radius: self.config.handle_radius,
            start_label: format_hour_minute(self.start.as_f64(), offset),
            end_label: format_hour_minute(self.end.as_f64(), offset),
            current_label: format_hour_minute_second(label_time, offset),
            dragging: preview.is_some(),
        }
    }
}
