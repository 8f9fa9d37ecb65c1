use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use technique_protocol::Category;

/// Statistics about one index build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Records seen in the input snapshot.
    pub total_records: usize,

    /// Records skipped because `active == false`.
    pub skipped_inactive: usize,

    /// Records actually indexed.
    pub indexed: usize,

    /// Indexed records per category, keyed by `Category::as_str`.
    pub per_category: BTreeMap<String, usize>,

    /// Distinct source documents among indexed records.
    pub distinct_sources: usize,

    /// Build time in milliseconds.
    pub time_ms: u64,
}

impl IndexStats {
    pub(crate) fn record_skipped(&mut self) {
        self.total_records += 1;
        self.skipped_inactive += 1;
    }

    pub(crate) fn record_indexed(&mut self, category: Category, sources: &mut HashSet<String>, source_id: &str) {
        self.total_records += 1;
        self.indexed += 1;
        *self
            .per_category
            .entry(category.as_str().to_string())
            .or_insert(0) += 1;
        if sources.insert(source_id.to_string()) {
            self.distinct_sources += 1;
        }
    }
}
