//! # Topic Records
//!
//! Last-seen timestamps for orphaned bus topics. A zero timestamp means the
//! topic was never recorded; a non-zero timestamp means it was observed
//! orphaned at least once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted observation of one orphaned topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicRecord<'a> {
    pub name: &'a str,
    /// Seconds since the Unix epoch; zero means never recorded.
    pub last_seen: u64,
}

impl TopicRecord<'_> {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.last_seen == 0
    }

    /// Seconds elapsed between the observation and `now`.
    #[must_use]
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_seen)
    }
}

/// A set of topic records keyed by topic name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicRecords(BTreeMap<String, u64>);

impl TopicRecords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite (never merge) the timestamp of `name`.
    pub fn insert(&mut self, name: impl Into<String>, last_seen: u64) {
        self.0.insert(name.into(), last_seen);
    }

    pub fn remove(&mut self, name: &str) -> Option<u64> {
        self.0.remove(name)
    }

    /// Timestamp for `name`, zero when never recorded.
    #[must_use]
    pub fn last_seen(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = TopicRecord<'_>> {
        self.0.iter().map(|(name, last_seen)| TopicRecord {
            name,
            last_seen: *last_seen,
        })
    }

    /// Records that have been observed at least once.
    #[must_use]
    pub fn non_zero(&self) -> TopicRecords {
        self.filter(|record| !record.is_zero())
    }

    /// Non-zero records whose age at `now` exceeds `retention_secs`.
    #[must_use]
    pub fn expired(&self, now: u64, retention_secs: u64) -> TopicRecords {
        self.filter(|record| !record.is_zero() && record.age(now) > retention_secs)
    }

    /// Records restricted to the given names.
    #[must_use]
    pub fn only<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> TopicRecords {
        let mut out = TopicRecords::new();
        for name in names {
            if let Some(last_seen) = self.0.get(name) {
                out.insert(name.clone(), *last_seen);
            }
        }
        out
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn filter(&self, keep: impl Fn(&TopicRecord<'_>) -> bool) -> TopicRecords {
        TopicRecords(
            self.iter()
                .filter(|record| keep(record))
                .map(|record| (record.name.to_string(), record.last_seen))
                .collect(),
        )
    }
}

impl FromIterator<(String, u64)> for TopicRecords {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3600;

    fn records(entries: &[(&str, u64)]) -> TopicRecords {
        entries
            .iter()
            .map(|(name, ts)| (name.to_string(), *ts))
            .collect()
    }

    #[test]
    fn test_insert_overwrites_older_and_newer() {
        let mut recs = records(&[("a", 500)]);
        recs.insert("a", 100);
        assert_eq!(recs.last_seen("a"), 100);
        assert_eq!(recs.last_seen("missing"), 0);
    }

    #[test]
    fn test_expired_requires_non_zero() {
        let recs = records(&[("zero", 0), ("old", 10), ("fresh", 10 * HOUR)]);
        let expired = recs.expired(10 * HOUR + 1, HOUR);
        assert_eq!(expired.names(), vec!["old".to_string()]);
    }

    #[test]
    fn test_expired_is_strictly_older_than_threshold() {
        let recs = records(&[("edge", 1000)]);
        assert!(recs.expired(1000 + HOUR, HOUR).is_empty());
        assert_eq!(recs.expired(1001 + HOUR, HOUR).len(), 1);
    }

    #[test]
    fn test_only_restricts_to_names() {
        let recs = records(&[("a", 1), ("b", 2), ("c", 3)]);
        let wanted = vec!["a".to_string(), "c".to_string(), "z".to_string()];
        assert_eq!(recs.only(&wanted).names(), vec!["a", "c"]);
    }

    #[test]
    fn test_json_shape_is_flat_map() {
        let recs = records(&[("a", 7)]);
        assert_eq!(serde_json::to_string(&recs).unwrap(), "{\"a\":7}");
    }
}
