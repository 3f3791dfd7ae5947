//! Raw trade dataset shapes as delivered by the data producer.
//!
//! Two layouts are accepted: a flat list of records that each carry their own
//! timestamp, or a map from a timestamp string to the records of that bucket.
//! Fields are read leniently: numbers may arrive as JSON numbers or numeric
//! strings, timestamps may also be date-time strings, and anything unusable
//! collapses to `None` instead of failing the whole payload.

use super::entities::TradeEvent;
use super::value_objects::{GeoPoint, Side};
use crate::time_utils::parse_timestamp_ms;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::BTreeMap;

/// Number that may be encoded as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlexNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl FlexNumber {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            FlexNumber::Number(value) => *value,
            FlexNumber::Text(text) => text.trim().parse::<f64>().ok()?,
            FlexNumber::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Epoch milliseconds: a number, a numeric string, or a date-time string.
    pub fn as_epoch_ms(&self) -> Option<f64> {
        match self {
            FlexNumber::Text(text) => {
                self.as_f64().or_else(|| parse_timestamp_ms(text).map(|ms| ms as f64))
            }
            _ => self.as_f64(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default, alias = "lat")]
    pub latitude: Option<FlexNumber>,
    #[serde(default, alias = "lon", alias = "lng")]
    pub longitude: Option<FlexNumber>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationField {
    Point(RawLocation),
    Other(IgnoredAny),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPostOffice {
    #[serde(default, rename = "State", alias = "state")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostOfficeField {
    Office(RawPostOffice),
    Other(IgnoredAny),
}

/// One trade record before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrade {
    #[serde(default, alias = "time", alias = "ts", alias = "exchange_update_time")]
    pub timestamp: Option<FlexNumber>,
    #[serde(default)]
    pub location: Option<LocationField>,
    #[serde(default, alias = "side")]
    pub buy_sell: Option<String>,
    #[serde(default)]
    pub amount: Option<FlexNumber>,
    #[serde(default, rename = "PostOffice", alias = "post_office")]
    pub post_office: Option<PostOfficeField>,
}

/// A record that could not be read as a trade object at all is kept as
/// `Malformed` so it can be counted rather than failing the payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    Trade(RawTrade),
    Malformed(IgnoredAny),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TradeDataset {
    Grouped(BTreeMap<String, Vec<RawRecord>>),
    Flat(Vec<RawRecord>),
}

impl TradeDataset {
    pub fn record_count(&self) -> usize {
        match self {
            TradeDataset::Grouped(groups) => groups.values().map(Vec::len).sum(),
            TradeDataset::Flat(records) => records.len(),
        }
    }
}

impl RawTrade {
    /// Epoch milliseconds, if the timestamp is a non-negative number or a
    /// date-time string at or after the epoch.
    pub fn timestamp_ms(&self) -> Option<u64> {
        let value = self.timestamp.as_ref()?.as_epoch_ms()?;
        (value >= 0.0).then(|| value.floor() as u64)
    }

    pub fn location(&self) -> Option<GeoPoint> {
        match self.location.as_ref()? {
            LocationField::Point(raw) => {
                let latitude = raw.latitude.as_ref()?.as_f64()?;
                let longitude = raw.longitude.as_ref()?.as_f64()?;
                Some(GeoPoint::new(latitude, longitude))
            }
            LocationField::Other(_) => None,
        }
    }

    /// State named by the post office block, if any.
    pub fn region(&self) -> Option<&str> {
        match self.post_office.as_ref()? {
            PostOfficeField::Office(office) => {
                office.state.as_deref().map(str::trim).filter(|state| !state.is_empty())
            }
            PostOfficeField::Other(_) => None,
        }
    }

    pub fn to_event(&self) -> TradeEvent {
        TradeEvent::new(
            self.location(),
            Side::from_code(self.buy_sell.as_deref()),
            self.amount.as_ref().and_then(FlexNumber::as_f64),
        )
        .with_region(self.region())
    }
}

/// Parse a grouped-dataset key such as `"1730467805000"`.
pub fn parse_bucket_label(label: &str) -> Option<u64> {
    let value = label.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then(|| value.floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_coordinates_are_accepted() {
        let raw: RawTrade = serde_json::from_str(
            r#"{"location": {"latitude": "19.07", "longitude": 72.87}, "buy_sell": "S"}"#,
        )
        .unwrap();
        let event = raw.to_event();
        assert_eq!(event.location, Some(GeoPoint::new(19.07, 72.87)));
        assert_eq!(event.side, Side::Sell);
    }

    #[test]
    fn junk_location_collapses_to_none() {
        let raw: RawTrade =
            serde_json::from_str(r#"{"location": "Mumbai", "buy_sell": "B"}"#).unwrap();
        assert_eq!(raw.location(), None);

        let raw: RawTrade =
            serde_json::from_str(r#"{"location": {"latitude": "", "longitude": null}}"#).unwrap();
        assert_eq!(raw.location(), None);
    }

    #[test]
    fn iso_update_time_and_post_office_state() {
        let raw: RawTrade = serde_json::from_str(
            r#"{"exchange_update_time": "2024-11-01T12:30:05.400Z", "buy_sell": "B",
                "PostOffice": {"Name": "Fort", "State": " Maharashtra "}}"#,
        )
        .unwrap();
        assert_eq!(raw.timestamp_ms(), Some(1_730_464_205_400));
        assert_eq!(raw.to_event().region.as_deref(), Some("Maharashtra"));

        let raw: RawTrade =
            serde_json::from_str(r#"{"ts": "1970-01-01T00:00:00Z", "PostOffice": null}"#).unwrap();
        assert_eq!(raw.timestamp_ms(), Some(0));
        assert_eq!(raw.region(), None);

        let raw: RawTrade = serde_json::from_str(r#"{"time": "1969-12-31T23:59:59Z"}"#).unwrap();
        assert_eq!(raw.timestamp_ms(), None);
    }

    #[test]
    fn bucket_labels() {
        assert_eq!(parse_bucket_label("1730467805000"), Some(1_730_467_805_000));
        assert_eq!(parse_bucket_label(" 42 "), Some(42));
        assert_eq!(parse_bucket_label("noon"), None);
        assert_eq!(parse_bucket_label("-5"), None);
    }
}
