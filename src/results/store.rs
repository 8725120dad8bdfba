//! Result Store - ordered, append-only storage for hypothesis outcomes

use super::HypothesisRecord;
use crate::decision::Decision;

/// Append-only store of hypothesis records.
///
/// ## Design
///
/// Records live in a vector: insertion order is report order. Repeated
/// hypothesis names are kept verbatim; nothing is merged, deduplicated or
/// removed.
///
/// ## Concurrency
///
/// The store has a single owner. Parallel evaluators hand their outcomes
/// back to that owner (see [`HypothesisSuite`](crate::suite::HypothesisSuite))
/// instead of sharing the store, so the append order stays deterministic.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    records: Vec<HypothesisRecord>,
}

impl ResultStore {
    /// Create a new empty result store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Append an outcome.
    pub fn add_result(
        &mut self,
        hypothesis_name: impl Into<String>,
        p_value: f64,
        decision: Decision,
    ) {
        self.add_record(HypothesisRecord::new(hypothesis_name, p_value, decision));
    }

    /// Append a fully-specified record.
    pub fn add_record(&mut self, record: HypothesisRecord) {
        self.records.push(record);
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[HypothesisRecord] {
        &self.records
    }

    /// Record at `index` in insertion order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HypothesisRecord> {
        self.records.get(index)
    }

    /// Iterate over records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, HypothesisRecord> {
        self.records.iter()
    }

    /// Records with the given name, in insertion order.
    #[must_use]
    pub fn records_named(&self, name: &str) -> Vec<&HypothesisRecord> {
        self.records.iter().filter(|r| r.name() == name).collect()
    }

    /// Number of records whose null hypothesis was rejected.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.decision().is_reject())
            .count()
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a HypothesisRecord;
    type IntoIter = std::slice::Iter<'a, HypothesisRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
