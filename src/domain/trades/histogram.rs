use super::index::TradeEventIndex;
use super::value_objects::{BucketKey, MINUTE_MS};
use std::collections::BTreeMap;

/// Trade counts per minute, computed once per load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinuteHistogram {
    counts: BTreeMap<BucketKey, u32>,
    max_count: u32,
}

impl MinuteHistogram {
    pub fn from_index(index: &TradeEventIndex) -> Self {
        let mut counts: BTreeMap<BucketKey, u32> = BTreeMap::new();
        for (key, events) in index.buckets().filter(|(_, events)| !events.is_empty()) {
            let count = u32::try_from(events.len()).unwrap_or(u32::MAX);
            let slot = counts.entry(key.minute()).or_insert(0);
            *slot = slot.saturating_add(count);
        }
        let max_count = counts.values().copied().max().unwrap_or(0);
        Self { counts, max_count }
    }

    pub fn count_at(&self, minute: BucketKey) -> u32 {
        self.counts.get(&minute.minute()).copied().unwrap_or(0)
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Minutes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (BucketKey, u32)> + '_ {
        self.counts.iter().map(|(minute, count)| (*minute, *count))
    }

    /// Minutes up to and including the one containing `current`.
    pub fn revealed_until(&self, current: BucketKey) -> impl Iterator<Item = (BucketKey, u32)> + '_ {
        self.counts.range(..=current.minute()).map(|(minute, count)| (*minute, *count))
    }
}

/// Number of whole minutes the range covers, never less than one.
pub fn minute_span(start: BucketKey, end: BucketKey) -> u64 {
    let range = end.value().saturating_sub(start.value());
    range.div_ceil(MINUTE_MS).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_rounds_up_and_has_a_floor() {
        assert_eq!(minute_span(BucketKey::from(0), BucketKey::from(0)), 1);
        assert_eq!(minute_span(BucketKey::from(0), BucketKey::from(60_000)), 1);
        assert_eq!(minute_span(BucketKey::from(0), BucketKey::from(60_001)), 2);
        assert_eq!(minute_span(BucketKey::from(5_000), BucketKey::from(1_000)), 1);
    }
}
