use crate::stats::IndexStats;
use std::collections::HashSet;
use std::time::Instant;
use technique_protocol::TechniqueRecord;
use technique_semantics::{extract_keywords, ConceptProfile, SemanticProfiler};

/// One active record with its derived retrieval features.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    pub record: TechniqueRecord,

    /// Concept profile of `name + " " + description`.
    pub profile: ConceptProfile,

    /// Up to 15 keywords, most salient first.
    pub keywords: Vec<String>,
}

/// Immutable index over the active records of one corpus snapshot.
///
/// Entries keep the input record order, which is the tie-breaking order
/// everywhere downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusIndex {
    entries: Vec<IndexedEntry>,
    stats: IndexStats,
}

impl CorpusIndex {
    /// Profile and keyword-extract every active record. Inactive records
    /// are dropped here and never reach scoring.
    #[must_use]
    pub fn build(records: &[TechniqueRecord], profiler: &SemanticProfiler) -> Self {
        let started = Instant::now();
        let mut stats = IndexStats::default();
        let mut sources = HashSet::new();
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            if !record.active {
                stats.record_skipped();
                continue;
            }

            let text = format!("{} {}", record.name, record.description);
            let entry = IndexedEntry {
                record: record.clone(),
                profile: profiler.profile(&text),
                keywords: extract_keywords(&text),
            };
            stats.record_indexed(record.category, &mut sources, &record.source_id);
            entries.push(entry);
        }

        stats.time_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "indexed {} of {} records ({} inactive skipped, {} sources) in {}ms",
            stats.indexed,
            stats.total_records,
            stats.skipped_inactive,
            stats.distinct_sources,
            stats.time_ms
        );

        Self { entries, stats }
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    #[must_use]
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use technique_protocol::Category;
    use technique_semantics::ConceptTaxonomy;

    fn record(id: &str, name: &str, description: &str, active: bool) -> TechniqueRecord {
        TechniqueRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: Category::Attack,
            source_id: "paper-1".to_string(),
            quality_estimate: 0.7,
            priority: None,
            complexity: None,
            active,
        }
    }

    fn profiler() -> SemanticProfiler {
        SemanticProfiler::new(ConceptTaxonomy::builtin())
    }

    #[test]
    fn inactive_records_are_dropped() {
        let records = vec![
            record("t-1", "Gradient trigger search", "adversarial suffix", true),
            record("t-2", "Retired probe", "obsolete", false),
        ];

        let index = CorpusIndex::build(&records, &profiler());

        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].record.id, "t-1");
        assert_eq!(index.stats().total_records, 2);
        assert_eq!(index.stats().skipped_inactive, 1);
        assert_eq!(index.stats().indexed, 1);
    }

    #[test]
    fn entries_carry_profile_and_keywords_from_name_and_description() {
        let records = vec![record(
            "t-1",
            "Adversarial suffix",
            "gradient search over prompt tokens",
            true,
        )];

        let index = CorpusIndex::build(&records, &profiler());
        let entry = &index.entries()[0];

        assert!(entry.profile.weight("adversarial") > 0.0);
        assert!(entry.profile.weight("optimization") > 0.0);
        assert!(entry.keywords.contains(&"adversarial".to_string()));
        assert!(entry.keywords.contains(&"tokens".to_string()));
        assert!(entry.keywords.len() <= technique_semantics::MAX_KEYWORDS);
    }

    #[test]
    fn empty_snapshot_builds_an_empty_index() {
        let index = CorpusIndex::build(&[], &profiler());
        assert!(index.is_empty());
        assert_eq!(index.stats(), &IndexStats::default());
    }

    #[test]
    fn input_order_is_preserved() {
        let records = vec![
            record("t-3", "c", "evaluation benchmark", true),
            record("t-1", "a", "jailbreak bypass", true),
            record("t-2", "b", "defense filter", true),
        ];

        let index = CorpusIndex::build(&records, &profiler());
        let ids: Vec<&str> = index
            .entries()
            .iter()
            .map(|e| e.record.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t-3", "t-1", "t-2"]);
    }
}
