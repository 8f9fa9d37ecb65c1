use crate::error::Result;
use crate::scorer::{QueryFeatures, RelevanceScorer};
use crate::selector::CoverageSelector;
use technique_indexer::CorpusIndex;
use technique_protocol::{Query, RetrievalConfig, SelectionResult, TechniqueRecord};
use technique_semantics::{ConceptTaxonomy, DomainAffinity, SemanticProfiler};

/// One-stop retrieval: index build, scoring, and selection behind a single
/// engine value.
///
/// The engine itself is immutable and `Send + Sync`; a concurrent host
/// shares it (and a built [`CorpusIndex`] snapshot) freely and swaps in a
/// freshly built index when the corpus changes.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    profiler: SemanticProfiler,
    scorer: RelevanceScorer,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    /// Engine with the built-in taxonomy and domain table. Fails fast on
    /// an invalid config, before anything is scored.
    pub fn new(config: RetrievalConfig) -> Result<Self> {
        Self::with_tables(ConceptTaxonomy::builtin(), DomainAffinity::builtin(), config)
    }

    /// Engine with caller-supplied tables.
    pub fn with_tables(
        taxonomy: ConceptTaxonomy,
        domains: DomainAffinity,
        config: RetrievalConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            profiler: SemanticProfiler::new(taxonomy),
            scorer: RelevanceScorer::new(domains),
            config,
        })
    }

    /// Build an index snapshot for a corpus. The snapshot is reusable
    /// across any number of [`retrieve`](Self::retrieve) calls.
    #[must_use]
    pub fn build_index(&self, records: &[TechniqueRecord]) -> CorpusIndex {
        CorpusIndex::build(records, &self.profiler)
    }

    /// Rank every indexed entry against the query and select a bounded,
    /// coverage-balanced subset.
    #[must_use]
    pub fn retrieve(&self, index: &CorpusIndex, query: &Query) -> SelectionResult {
        let features = QueryFeatures::extract(&self.profiler, query);
        if features.is_unconstrained() {
            log::warn!("query has no objective or context text; domain-only scoring, low confidence");
        }

        let scored = self.scorer.score_all(&features, index);
        log::debug!("scored {} entries", scored.len());

        let result = CoverageSelector::select(
            index,
            scored,
            &self.config,
            features.is_unconstrained(),
        );
        log::info!(
            "retrieved {} of {} entries ({} high, {} medium, {} sources)",
            result.len(),
            index.len(),
            result.report.high_relevance,
            result.report.medium_relevance,
            result.report.distinct_sources
        );

        result
    }

    /// Convenience: build an index for `records` and retrieve in one call.
    /// Hosts serving repeated queries should build once and call
    /// [`retrieve`](Self::retrieve) instead.
    #[must_use]
    pub fn retrieve_from_records(
        &self,
        records: &[TechniqueRecord],
        query: &Query,
    ) -> SelectionResult {
        let index = self.build_index(records);
        self.retrieve(&index, query)
    }

    #[must_use]
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    #[must_use]
    pub fn profiler(&self) -> &SemanticProfiler {
        &self.profiler
    }
}
