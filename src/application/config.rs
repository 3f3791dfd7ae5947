use crate::domain::errors::{AppError, DataResult};
use crate::domain::playback::AdvanceMode;
use crate::domain::trades::Side;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Every tunable of the map. Any section or field may be omitted from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub renderer: RendererConfig,
    pub playback: PlaybackConfig,
    pub scrub: ScrubConfig,
    pub timeline: TimelineConfig,
    pub layout: LayoutConfig,
    pub data: DataSourceConfig,
}

impl VisualizationConfig {
    pub fn from_json(json: &str) -> DataResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DataResult<()> {
        let checks = [
            (self.renderer.fade_duration_ms > 0.0, "renderer.fade_duration_ms must be positive"),
            (self.renderer.marker_radius >= 0.0, "renderer.marker_radius must not be negative"),
            (
                self.renderer.region_flash.as_ref().is_none_or(|flash| {
                    flash.flash_ms > 0.0 && flash.fade_ms >= 0.0 && flash.darken_step >= 0.0
                }),
                "renderer.region_flash needs a positive flash_ms and non-negative fade_ms",
            ),
            (self.playback.tick_interval_ms > 0, "playback.tick_interval_ms must be positive"),
            (self.scrub.debounce_ms >= 0.0, "scrub.debounce_ms must not be negative"),
            (
                (0.0..1.0).contains(&self.layout.padding),
                "layout.padding must be in [0, 1)",
            ),
            (
                self.layout.map_height_fraction > 0.0,
                "layout.map_height_fraction must be positive",
            ),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, message)) => Err(AppError::ValidationError((*message).to_string())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub fade_duration_ms: f64,
    pub marker_radius: f64,
    pub halo: Option<HaloStyle>,
    pub colors: SideColors,
    pub radius_mode: RadiusMode,
    /// Grid cell size for thinning dense buckets; `None` draws every trade.
    pub density_cell_px: Option<f64>,
    pub clip_to_draw_area: bool,
    /// Flash whole states as their trades play; `None` leaves the map static.
    pub region_flash: Option<RegionFlashStyle>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fade_duration_ms: 12_000.0,
            marker_radius: 3.0,
            halo: Some(HaloStyle::default()),
            colors: SideColors::default(),
            radius_mode: RadiusMode::Fixed,
            density_cell_px: None,
            clip_to_draw_area: true,
            region_flash: None,
        }
    }
}

/// Per-state flash: the fill eases to the trade's side colour over
/// `flash_ms`, then back to `base_color` over `fade_ms`. Overlapping flashes
/// darken the colour by `darken_step` each, up to `max_intensity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionFlashStyle {
    pub flash_ms: f64,
    pub fade_ms: f64,
    pub max_intensity: u32,
    pub darken_step: f64,
    pub colors: SideColors,
    pub base_color: String,
}

impl Default for RegionFlashStyle {
    fn default() -> Self {
        Self {
            flash_ms: 500.0,
            fade_ms: 500.0,
            max_intensity: 5,
            darken_step: 0.2,
            colors: SideColors { buy: "#F4F67E".to_string(), sell: "#FA7F26".to_string() },
            base_color: "#262626".to_string(),
        }
    }
}

/// Soft glow drawn around each marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaloStyle {
    pub radius: f64,
    pub alpha: f64,
}

impl Default for HaloStyle {
    fn default() -> Self {
        Self { radius: 12.0, alpha: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideColors {
    pub buy: String,
    pub sell: String,
}

impl Default for SideColors {
    fn default() -> Self {
        Self { buy: "#FAB726".to_string(), sell: "#5D43E6".to_string() }
    }
}

impl SideColors {
    pub fn color_for(&self, side: Side) -> &str {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RadiusMode {
    /// Every marker uses `RendererConfig::marker_radius`.
    #[default]
    Fixed,
    /// Radius grows with the log of the traded amount.
    AmountLog {
        #[serde(default = "default_min_amount")]
        min_amount: f64,
        #[serde(default = "default_max_amount")]
        max_amount: f64,
        #[serde(default = "default_min_radius")]
        min_radius: f64,
        #[serde(default = "default_max_radius")]
        max_radius: f64,
    },
}

fn default_min_amount() -> f64 {
    1.0
}

fn default_max_amount() -> f64 {
    123_499.0
}

fn default_min_radius() -> f64 {
    1.0
}

fn default_max_radius() -> f64 {
    14.0
}

impl RadiusMode {
    pub fn amount_log() -> Self {
        RadiusMode::AmountLog {
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
        }
    }

    /// Base radius for a trade of `amount`.
    pub fn radius_for(&self, amount: Option<f64>, fixed_radius: f64) -> f64 {
        match *self {
            RadiusMode::Fixed => fixed_radius,
            RadiusMode::AmountLog { min_amount, max_amount, min_radius, max_radius } => {
                let Some(amount) = amount.filter(|a| a.is_finite() && *a > 0.0) else {
                    return min_radius;
                };
                let low = min_amount.max(f64::MIN_POSITIVE).ln();
                let high = max_amount.max(f64::MIN_POSITIVE).ln();
                if high <= low {
                    return min_radius;
                }
                let t = ((amount.ln() - low) / (high - low)).clamp(0.0, 1.0);
                min_radius + (max_radius - min_radius) * t
            }
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AdvanceKind {
    #[default]
    NextKey,
    FixedStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u32,
    pub advance: AdvanceKind,
    pub step_ms: u64,
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { tick_interval_ms: 1_000, advance: AdvanceKind::NextKey, step_ms: 1_000, autoplay: true }
    }
}

impl PlaybackConfig {
    pub fn advance_mode(&self) -> AdvanceMode {
        match self.advance {
            AdvanceKind::NextKey => AdvanceMode::NextKey,
            AdvanceKind::FixedStep => AdvanceMode::FixedStep(self.step_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    pub debounce_ms: f64,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self { debounce_ms: 150.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub max_bar_height: f64,
    pub histogram_padding: f64,
    pub track_height: f64,
    pub handle_radius: f64,
    /// Offset applied to epoch times for labels, in minutes east of UTC.
    pub utc_offset_minutes: i32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_bar_height: 50.0,
            histogram_padding: 0.0,
            track_height: 8.0,
            handle_radius: 8.0,
            utc_offset_minutes: 330,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub padding: f64,
    pub map_height_fraction: f64,
    pub timeline_height: f64,
    pub spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { padding: 0.15, map_height_fraction: 0.9, timeline_height: 100.0, spacing: 60.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    pub trades_url: String,
    pub boundary_url: String,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            trades_url: "data/grouped_trades.json".to_string(),
            boundary_url: "data/india_boundaries.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_radius_hits_both_ends() {
        let mode = RadiusMode::amount_log();
        assert_eq!(mode.radius_for(None, 3.0), 1.0);
        assert_eq!(mode.radius_for(Some(0.0), 3.0), 1.0);
        assert!((mode.radius_for(Some(123_499.0), 3.0) - 14.0).abs() < 1e-9);
        assert!((mode.radius_for(Some(10_000_000.0), 3.0) - 14.0).abs() < 1e-9);
        assert_eq!(RadiusMode::Fixed.radius_for(Some(500.0), 3.0), 3.0);
    }

    #[test]
    fn advance_kind_parses_kebab_case() {
        use std::str::FromStr;
        assert_eq!(AdvanceKind::from_str("fixed-step").ok(), Some(AdvanceKind::FixedStep));
        assert_eq!(AdvanceKind::NextKey.as_ref(), "next-key");
    }
}
