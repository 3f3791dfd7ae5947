use crate::application::config::LayoutConfig;
use crate::domain::screen::{ScreenPoint, ScreenRect};

/// Page geometry derived from the container width and viewport height.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewLayout {
    pub width: f64,
    pub map_height: f64,
    pub padded_width: f64,
    pub padded_height: f64,
    pub total_height: f64,
    pub timeline_height: f64,
    pub spacing: f64,
}

impl ViewLayout {
    pub fn new(width: f64, viewport_height: f64, config: &LayoutConfig) -> Self {
        let width = width.max(0.0);
        let map_height = viewport_height.max(0.0) * config.map_height_fraction;
        Self {
            width,
            map_height,
            padded_width: width * (1.0 - config.padding),
            padded_height: map_height * (1.0 - config.padding),
            total_height: map_height + config.timeline_height + config.spacing,
            timeline_height: config.timeline_height,
            spacing: config.spacing,
        }
    }

    /// Top-left of the projected map inside the page.
    pub fn map_offset(&self) -> ScreenPoint {
        ScreenPoint::new(
            (self.width - self.padded_width) / 2.0,
            (self.map_height - self.padded_height) / 2.0,
        )
    }

    /// Box the projection is fitted to, in map-local pixels.
    pub fn draw_area(&self) -> ScreenRect {
        ScreenRect::from_size(self.padded_width, self.padded_height)
    }

    /// Timeline band of `track_width`, centred under the map.
    pub fn timeline_rect(&self, track_width: f64) -> ScreenRect {
        let track_width = track_width.clamp(0.0, self.width);
        ScreenRect::new(
            (self.width - track_width) / 2.0,
            self.total_height - self.timeline_height,
            track_width,
            self.timeline_height,
        )
    }
}
