pub mod dataset;
pub mod entities;
pub mod histogram;
pub mod index;
pub mod value_objects;

pub use dataset::{RawRecord, RawTrade, TradeDataset};
pub use entities::TradeEvent;
pub use histogram::{MinuteHistogram, minute_span};
pub use index::{TradeEventIndex, nearest_key};
pub use value_objects::{BucketKey, GeoPoint, MINUTE_MS, SECOND_MS, Side};
