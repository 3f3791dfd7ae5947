pub use super::value_objects::{GeoPoint, Side};
use serde::{Deserialize, Serialize};

/// Domain entity - a single trade, immutable once indexed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub location: Option<GeoPoint>,
    pub side: Side,
    pub amount: Option<f64>,
    /// Administrative region (state) the trade was booked in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl TradeEvent {
    pub fn new(location: Option<GeoPoint>, side: Side, amount: Option<f64>) -> Self {
        Self { location, side, amount, region: None }
    }

    pub fn with_region(mut self, region: Option<&str>) -> Self {
        self.region = region.map(str::to_string);
        self
    }

    pub fn at(latitude: f64, longitude: f64, side: Side) -> Self {
        Self::new(Some(GeoPoint::new(latitude, longitude)), side, None)
    }

    /// Location usable for projection; events without one are kept but never drawn.
    pub fn renderable_location(&self) -> Option<GeoPoint> {
        self.location.filter(GeoPoint::is_valid)
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }
}
