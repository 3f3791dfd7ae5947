use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter};

pub const SECOND_MS: u64 = 1_000;
pub const MINUTE_MS: u64 = 60 * SECOND_MS;

/// Value Object - time bucket key in epoch milliseconds
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    From,
    Into,
    Display,
    Constructor,
    Serialize,
    Deserialize,
)]
#[display(fmt = "{}", _0)]
pub struct BucketKey(u64);

impl BucketKey {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Round down to a multiple of `granularity_ms`.
    pub fn floor_to(&self, granularity_ms: u64) -> Self {
        if granularity_ms == 0 {
            return *self;
        }
        Self(self.0 / granularity_ms * granularity_ms)
    }

    /// Start of the minute containing this key.
    pub fn minute(&self) -> Self {
        self.floor_to(MINUTE_MS)
    }

    pub fn distance_to(&self, time: f64) -> f64 {
        (self.as_f64() - time).abs()
    }
}

/// Value Object - trade direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, AsRefStr, Serialize, Deserialize,
)]
pub enum Side {
    #[strum(serialize = "B")]
    Buy,
    #[strum(serialize = "S")]
    Sell,
}

impl Side {
    /// Producer codes are `B`/`S`; anything that is not a sell is drawn as a buy.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(code) if code.eq_ignore_ascii_case("s") || code.eq_ignore_ascii_case("sell") => {
                Side::Sell
            }
            _ => Side::Buy,
        }
    }
}

/// Value Object - geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Finite and inside the valid lat/lon ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_floor() {
        assert_eq!(BucketKey::from(61_999).minute(), BucketKey::from(60_000));
        assert_eq!(BucketKey::from(59_999).minute(), BucketKey::from(0));
    }

    #[test]
    fn side_codes() {
        assert_eq!(Side::from_code(Some("S")), Side::Sell);
        assert_eq!(Side::from_code(Some(" sell ")), Side::Sell);
        assert_eq!(Side::from_code(Some("B")), Side::Buy);
        assert_eq!(Side::from_code(None), Side::Buy);
        assert_eq!(Side::Sell.to_string(), "S");
    }
}
