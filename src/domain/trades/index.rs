use super::dataset::{RawRecord, TradeDataset, parse_bucket_label};
use super::entities::TradeEvent;
use super::value_objects::{BucketKey, SECOND_MS};
use crate::domain::errors::{AppError, DataResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_warn};
use std::collections::BTreeMap;

/// Granularity applied to flat records; grouped datasets keep their keys.
pub const FLAT_RECORD_GRANULARITY_MS: u64 = SECOND_MS;

/// Read-only mapping from time bucket to the trades inside it.
#[derive(Debug, Clone, Default)]
pub struct TradeEventIndex {
    buckets: BTreeMap<BucketKey, Vec<TradeEvent>>,
    keys: Vec<BucketKey>,
    total_events: usize,
    rejected_records: usize,
}

impl TradeEventIndex {
    /// Build from already-bucketed events. Input order within a bucket is kept.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = (BucketKey, TradeEvent)>,
    {
        let mut buckets: BTreeMap<BucketKey, Vec<TradeEvent>> = BTreeMap::new();
        for (key, event) in events {
            buckets.entry(key).or_default().push(event);
        }
        Self::from_buckets(buckets, 0)
    }

    pub fn from_dataset(dataset: TradeDataset) -> Self {
        let index = match dataset {
            TradeDataset::Grouped(groups) => Self::from_grouped(groups),
            TradeDataset::Flat(records) => Self::from_records(records),
        };

        if index.rejected_records > 0 {
            log_warn!(
                LogComponent::Domain("TradeEventIndex"),
                "Skipped {} trade records without a usable timestamp",
                index.rejected_records
            );
        }
        log_debug!(
            LogComponent::Domain("TradeEventIndex"),
            "Indexed {} trades into {} buckets",
            index.total_events,
            index.keys.len()
        );
        index
    }

    /// Flat list: each record's own timestamp, floored to whole seconds.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let mut buckets: BTreeMap<BucketKey, Vec<TradeEvent>> = BTreeMap::new();
        let mut rejected = 0;

        for record in records {
            let RawRecord::Trade(trade) = record else {
                rejected += 1;
                continue;
            };
            match trade.timestamp_ms() {
                Some(ms) => {
                    let key = BucketKey::from(ms).floor_to(FLAT_RECORD_GRANULARITY_MS);
                    buckets.entry(key).or_default().push(trade.to_event());
                }
                None => rejected += 1,
            }
        }

        Self::from_buckets(buckets, rejected)
    }

    /// Pre-grouped map: keys are taken verbatim from the producer.
    pub fn from_grouped(groups: BTreeMap<String, Vec<RawRecord>>) -> Self {
        let mut buckets: BTreeMap<BucketKey, Vec<TradeEvent>> = BTreeMap::new();
        let mut rejected = 0;

        for (label, records) in groups {
            let Some(ms) = parse_bucket_label(&label) else {
                rejected += records.len();
                continue;
            };
            let bucket = buckets.entry(BucketKey::from(ms)).or_default();
            for record in records {
                match record {
                    RawRecord::Trade(trade) => bucket.push(trade.to_event()),
                    RawRecord::Malformed(_) => rejected += 1,
                }
            }
        }

        Self::from_buckets(buckets, rejected)
    }

    /// Parse a JSON payload of either shape.
    pub fn from_json_slice(bytes: &[u8]) -> DataResult<Self> {
        let dataset: TradeDataset = serde_json::from_slice(bytes)
            .map_err(|e| AppError::DataError(format!("Trade dataset is not readable: {}", e)))?;
        Ok(Self::from_dataset(dataset))
    }

    pub fn from_json_str(json: &str) -> DataResult<Self> {
        Self::from_json_slice(json.as_bytes())
    }

    /// Buckets left empty by a grouped label stay in the key list so they
    /// still bound the playback range.
    fn from_buckets(buckets: BTreeMap<BucketKey, Vec<TradeEvent>>, rejected: usize) -> Self {
        let keys: Vec<BucketKey> = buckets.keys().copied().collect();
        let total_events = buckets.values().map(Vec::len).sum();
        Self { buckets, keys, total_events, rejected_records: rejected }
    }

    /// Events in `key`'s bucket; empty when the bucket does not exist.
    pub fn events_at(&self, key: BucketKey) -> &[TradeEvent] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> impl Iterator<Item = (BucketKey, &[TradeEvent])> {
        self.buckets.iter().map(|(key, events)| (*key, events.as_slice()))
    }

    /// Sorted, distinct bucket keys.
    pub fn keys(&self) -> &[BucketKey] {
        &self.keys
    }

    pub fn min_key(&self) -> Option<BucketKey> {
        self.keys.first().copied()
    }

    pub fn max_key(&self) -> Option<BucketKey> {
        self.keys.last().copied()
    }

    /// First key whose bucket holds at least one trade; playback opens here.
    pub fn initial_key(&self) -> Option<BucketKey> {
        self.buckets.iter().find(|(_, events)| !events.is_empty()).map(|(key, _)| *key)
    }

    pub fn bucket_count(&self) -> usize {
        self.keys.len()
    }

    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// Events that carry a drawable location.
    pub fn located_events(&self) -> usize {
        self.buckets
            .values()
            .flatten()
            .filter(|event| event.renderable_location().is_some())
            .count()
    }

    pub fn rejected_records(&self) -> usize {
        self.rejected_records
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn nearest_key(&self, time: f64) -> Option<BucketKey> {
        nearest_key(&self.keys, time)
    }
}

/// Key with the smallest distance to `time`; ties go to the earlier key.
pub fn nearest_key(keys: &[BucketKey], time: f64) -> Option<BucketKey> {
    if keys.is_empty() || time.is_nan() {
        return None;
    }
    let split = keys.partition_point(|key| key.as_f64() < time);
    let before = split.checked_sub(1).map(|i| keys[i]);
    let after = keys.get(split).copied();

    match (before, after) {
        (Some(before), Some(after)) => {
            if after.distance_to(time) < before.distance_to(time) {
                Some(after)
            } else {
                Some(before)
            }
        }
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[u64]) -> Vec<BucketKey> {
        values.iter().copied().map(BucketKey::from).collect()
    }

    #[test]
    fn nearest_prefers_earlier_on_tie() {
        let keys = keys(&[0, 60_000, 61_000]);
        assert_eq!(nearest_key(&keys, 30_000.0), Some(BucketKey::from(0)));
        assert_eq!(nearest_key(&keys, 60_500.0), Some(BucketKey::from(60_000)));
    }

    #[test]
    fn empty_labels_keep_their_keys() {
        let index =
            TradeEventIndex::from_json_str(r#"{"0": [], "60000": [{"buy_sell": "B"}], "120000": []}"#)
                .unwrap();
        assert_eq!(index.keys(), keys(&[0, 60_000, 120_000]).as_slice());
        assert_eq!(index.initial_key(), Some(BucketKey::from(60_000)));
        assert_eq!(index.total_events(), 1);
    }

    #[test]
    fn nearest_clamps_outside_range() {
        let keys = keys(&[1_000, 2_000]);
        assert_eq!(nearest_key(&keys, -50.0), Some(BucketKey::from(1_000)));
        assert_eq!(nearest_key(&keys, 9_000.0), Some(BucketKey::from(2_000)));
        assert_eq!(nearest_key(&[], 9_000.0), None);
    }
}
