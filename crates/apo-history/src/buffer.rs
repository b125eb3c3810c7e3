//! The bounded, duplicate-suppressing query buffer.

use std::collections::BTreeMap;

/// Maximum number of remembered queries.
pub const HISTORY_CAPACITY: usize = 5;

/// An immutable snapshot of past search queries, oldest first.
///
/// All mutations are pure: they return a new snapshot and leave the
/// receiver untouched. The caller persists the result through a
/// [`HistoryStore`](crate::HistoryStore); whether the display order is
/// oldest- or newest-first is the caller's policy, both are exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query.
    ///
    /// Inserting a query that is already present (case-sensitive exact
    /// match) is a no-op. At capacity the oldest entry is evicted and the
    /// remaining entries shift down. An oversized snapshot (corrupted
    /// persisted state) is repaired here rather than rejected: only the
    /// newest entries survive, the new insertion included.
    #[must_use]
    pub fn insert(&self, query: &str) -> Self {
        if self.contains(query) {
            return self.clone();
        }

        let mut entries = self.entries.clone();
        entries.push(query.to_string());
        if entries.len() > HISTORY_CAPACITY {
            let excess = entries.len() - HISTORY_CAPACITY;
            entries.drain(..excess);
        }

        Self { entries }
    }

    /// Remove a query, if present.
    #[must_use]
    pub fn remove(&self, query: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|q| *q != query)
                .cloned()
                .collect(),
        }
    }

    /// Drop all entries.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Whether the exact query is already remembered.
    #[must_use]
    pub fn contains(&self, query: &str) -> bool {
        self.entries.iter().any(|q| q == query)
    }

    /// Number of remembered queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no query is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Queries, newest first (the usual display order).
    #[must_use]
    pub fn newest_first(&self) -> Vec<&str> {
        self.entries.iter().rev().map(String::as_str).collect()
    }

    /// Render the buffer as the stringified-integer-keyed mapping the
    /// persistence collaborator stores (`"0"` = oldest).
    #[must_use]
    pub fn to_entries(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, query)| (index.to_string(), query.clone()))
            .collect()
    }

    /// Rebuild a buffer from a persisted mapping.
    ///
    /// Tolerates sparse and unordered keys by sorting on the numeric key;
    /// non-numeric keys are dropped. An oversized mapping is loaded as-is
    /// and repaired by the next [`insert`](Self::insert).
    #[must_use]
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Self {
        let mut keyed: Vec<(usize, &String)> = entries
            .iter()
            .filter_map(|(key, query)| key.parse().ok().map(|index: usize| (index, query)))
            .collect();
        keyed.sort_by_key(|(index, _)| *index);

        Self {
            entries: keyed.into_iter().map(|(_, query)| query.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_insert() {
        let history = SearchHistory::new().insert("aspirin");
        assert_eq!(history.to_entries(), entries(&[("0", "aspirin")]));
    }

    #[test]
    fn test_fill_then_evict_oldest() {
        let mut history = SearchHistory::new();
        for query in ["aspirin", "vitamin", "syrup", "gel", "mask"] {
            history = history.insert(query);
        }
        assert_eq!(
            history.to_entries(),
            entries(&[
                ("0", "aspirin"),
                ("1", "vitamin"),
                ("2", "syrup"),
                ("3", "gel"),
                ("4", "mask"),
            ])
        );

        // A sixth distinct query evicts key 0 and shifts everything down.
        let history = history.insert("balm");
        assert_eq!(
            history.to_entries(),
            entries(&[
                ("0", "vitamin"),
                ("1", "syrup"),
                ("2", "gel"),
                ("3", "mask"),
                ("4", "balm"),
            ])
        );
    }

    #[test]
    fn test_duplicate_is_a_noop() {
        let history = SearchHistory::new().insert("aspirin").insert("vitamin");
        let same = history.insert("aspirin");
        assert_eq!(same, history);

        // Case-sensitive: a different casing is a new entry.
        let other = history.insert("Aspirin");
        assert_eq!(other.len(), 3);
    }

    #[test]
    fn test_remove_and_clear() {
        let history = SearchHistory::new().insert("aspirin").insert("vitamin");
        assert_eq!(history.remove("aspirin").newest_first(), vec!["vitamin"]);
        assert_eq!(history.remove("nope"), history);
        assert!(history.clear().is_empty());
    }

    #[test]
    fn test_display_orders() {
        let history = SearchHistory::new().insert("aspirin").insert("vitamin");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["aspirin", "vitamin"]);
        assert_eq!(history.newest_first(), vec!["vitamin", "aspirin"]);
    }

    #[test]
    fn test_from_entries_sorts_sparse_and_unordered_keys() {
        let mapping = entries(&[("3", "gel"), ("0", "aspirin"), ("10", "mask"), ("x", "junk")]);
        let history = SearchHistory::from_entries(&mapping);
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            vec!["aspirin", "gel", "mask"]
        );
    }

    #[test]
    fn test_oversized_snapshot_is_repaired_on_insert() {
        let mapping = entries(&[
            ("0", "a"),
            ("1", "b"),
            ("2", "c"),
            ("3", "d"),
            ("4", "e"),
            ("5", "f"),
            ("6", "g"),
        ]);
        let corrupt = SearchHistory::from_entries(&mapping);
        assert_eq!(corrupt.len(), 7);

        let repaired = corrupt.insert("h");
        assert_eq!(repaired.len(), HISTORY_CAPACITY);
        assert_eq!(repaired.newest_first(), vec!["h", "g", "f", "e", "d"]);
    }

    proptest! {
        #[test]
        fn prop_size_never_exceeds_capacity(queries in proptest::collection::vec("[a-z]{1,8}", 0..40)) {
            let mut history = SearchHistory::new();
            for query in &queries {
                history = history.insert(query);
                prop_assert!(history.len() <= HISTORY_CAPACITY);
            }
        }

        #[test]
        fn prop_no_duplicates_survive(queries in proptest::collection::vec("[a-z]{1,4}", 0..40)) {
            let mut history = SearchHistory::new();
            for query in &queries {
                history = history.insert(query);
            }
            let collected: Vec<&str> = history.iter().collect();
            let mut deduped = collected.clone();
            deduped.sort_unstable();
            deduped.dedup();
            prop_assert_eq!(collected.len(), deduped.len());
        }

        #[test]
        fn prop_round_trips_through_entries(queries in proptest::collection::vec("[a-z]{1,8}", 0..10)) {
            let mut history = SearchHistory::new();
            for query in &queries {
                history = history.insert(query);
            }
            prop_assert_eq!(SearchHistory::from_entries(&history.to_entries()), history);
        }

        #[test]
        fn prop_insert_keeps_newest(queries in proptest::collection::vec("[a-z]{1,8}", 1..40)) {
            let mut history = SearchHistory::new();
            for query in &queries {
                history = history.insert(query);
            }
            // The most recent distinct query is always remembered.
            let last = queries.last().unwrap();
            prop_assert!(history.contains(last));
        }
    }
}
