use crate::application::config::{RendererConfig, SideColors};
use crate::application::region_flash::RegionFill;
use crate::domain::geography::Projection;
use crate::domain::logging::LogComponent;
use crate::domain::screen::ScreenPoint;
use crate::domain::trades::{Side, TradeEvent};
use crate::ecs::MarkerWorld;
use crate::ecs::systems::fade_markers;
use crate::log_trace;
use serde::Serialize;
use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HaloSprite {
    pub radius: f64,
    pub alpha: f64,
}

/// What a surface draws for one live marker in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerSprite {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub alpha: f64,
    pub side: Side,
    pub halo: Option<HaloSprite>,
}

/// Draw target for marker frames.
pub trait MarkerSurface {
    fn clear(&mut self);
    fn draw_markers(&mut self, sprites: &[MarkerSprite], colors: &SideColors);

    /// Flashed regions, drawn under the markers. Surfaces without region
    /// shapes skip them.
    fn fill_regions(&mut self, _fills: &[RegionFill]) {}
}

/// Turns bucket events into fading markers and draws them frame by frame.
pub struct FrameRenderer {
    config: RendererConfig,
    markers: MarkerWorld,
}

impl FrameRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config, markers: MarkerWorld::new() }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Spawns one marker per drawable event; returns how many were spawned.
    pub fn spawn_bucket(&mut self, events: &[TradeEvent], projection: &Projection, now: f64) -> usize {
        let placed = self.place(events, projection);
        let mut occupied: HashSet<(i64, i64)> = HashSet::new();
        let mut spawned = 0;

        for (point, event) in placed {
            if let Some(cell) = self.config.density_cell_px.filter(|cell| *cell > 0.0) {
                let key = ((point.x / cell).floor() as i64, (point.y / cell).floor() as i64);
                if !occupied.insert(key) {
                    continue;
                }
            }
            let radius = self.config.radius_mode.radius_for(event.amount, self.config.marker_radius);
            self.markers.spawn_marker(point, event.side, radius, now);
            spawned += 1;
        }

        log_trace!(
            LogComponent::Application("FrameRenderer"),
            "Spawned {} of {} markers ({} active)",
            spawned,
            events.len(),
            self.markers.active_count()
        );
        spawned
    }

    fn place<'a>(
        &self,
        events: &'a [TradeEvent],
        projection: &Projection,
    ) -> Vec<(ScreenPoint, &'a TradeEvent)> {
        let clip = self.config.clip_to_draw_area;
        let project = |event: &'a TradeEvent| {
            let point = projection.project(event.renderable_location()?);
            let visible = point.is_finite() && (!clip || projection.contains(point));
            visible.then_some((point, event))
        };

        #[cfg(feature = "parallel")]
        {
            events.par_iter().filter_map(project).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            events.iter().filter_map(project).collect()
        }
    }

    /// Fades every marker to `now`, dropping the expired ones.
    pub fn advance(&mut self, now: f64) -> Vec<MarkerSprite> {
        let halo = self.config.halo;
        fade_markers(&mut self.markers.world, now, self.config.fade_duration_ms)
            .into_iter()
            .map(|marker| MarkerSprite {
                x: marker.position.x,
                y: marker.position.y,
                radius: marker.base_radius * marker.scale,
                alpha: marker.scale,
                side: marker.side,
                halo: halo.map(|style| HaloSprite {
                    radius: style.radius * marker.scale,
                    alpha: style.alpha * marker.scale,
                }),
            })
            .collect()
    }

    /// Clears and redraws the surface. `true` while any marker is still visible.
    pub fn render_frame(&mut self, now: f64, surface: &mut dyn MarkerSurface) -> bool {
        self.render_frame_with_regions(now, &[], surface)
    }

    /// Like `render_frame`, with region fills painted first. `true` while
    /// any marker or fill is still visible.
    pub fn render_frame_with_regions(
        &mut self,
        now: f64,
        fills: &[RegionFill],
        surface: &mut dyn MarkerSurface,
    ) -> bool {
        let sprites = self.advance(now);
        surface.clear();
        if !fills.is_empty() {
            surface.fill_regions(fills);
        }
        if !sprites.is_empty() {
            surface.draw_markers(&sprites, &self.config.colors);
        }
        !sprites.is_empty() || !fills.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn active_count(&self) -> usize {
        self.markers.active_count()
    }

    pub fn spawned_total(&self) -> u64 {
        self.markers.spawned_total()
    }
}
