use std::collections::HashSet;
use technique_indexer::{CorpusIndex, IndexedEntry};
use technique_protocol::Query;
use technique_semantics::{word_set, ConceptProfile, DomainAffinity, SemanticProfiler};

const SEMANTIC_WEIGHT: f32 = 0.5;
const KEYWORD_WEIGHT: f32 = 0.3;
const DOMAIN_WEIGHT: f32 = 0.2;

/// Query-side features, computed once per retrieval and reused against
/// every indexed entry.
#[derive(Debug, Clone)]
pub struct QueryFeatures {
    profile: ConceptProfile,
    words: HashSet<String>,
    domain_label: String,
    unconstrained: bool,
}

impl QueryFeatures {
    /// Profile the query (objective + context + domain label) and collect
    /// its uncapped word set (objective + context).
    #[must_use]
    pub fn extract(profiler: &SemanticProfiler, query: &Query) -> Self {
        let profile_text = format!(
            "{} {} {}",
            query.objective_text, query.context_text, query.domain_label
        );
        let keyword_text = format!("{} {}", query.objective_text, query.context_text);

        Self {
            profile: profiler.profile(&profile_text),
            words: word_set(&keyword_text),
            domain_label: query.domain_label.clone(),
            unconstrained: query.is_unconstrained(),
        }
    }

    /// True when the query had no objective and no context text; scoring
    /// then degrades to the domain factor alone.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.unconstrained
    }
}

/// One indexed entry with its score breakdown. `index` points into the
/// corpus index's entry list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry {
    pub index: usize,
    pub semantic_score: f32,
    pub keyword_score: f32,
    pub domain_score: f32,
    pub final_score: f32,
}

/// Multi-factor relevance scoring: semantic profile similarity, keyword
/// overlap, and domain affinity, blended 0.5 / 0.3 / 0.2.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    domains: DomainAffinity,
}

impl RelevanceScorer {
    #[must_use]
    pub fn new(domains: DomainAffinity) -> Self {
        Self { domains }
    }

    /// Score every entry of the index, preserving entry order. Pure; the
    /// same features and index always yield the same scores.
    #[must_use]
    pub fn score_all(&self, features: &QueryFeatures, corpus: &CorpusIndex) -> Vec<ScoredEntry> {
        corpus
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| self.score(features, entry, index))
            .collect()
    }

    #[must_use]
    pub fn score(&self, features: &QueryFeatures, entry: &IndexedEntry, index: usize) -> ScoredEntry {
        let domain_score = self
            .domains
            .score(&features.domain_label, entry.record.category)
            .clamp(0.0, 1.0);

        if features.unconstrained {
            // No usable query text: the blend would pin every entry below
            // the medium tier, so the domain factor stands alone and the
            // caller flags the result low-confidence.
            return ScoredEntry {
                index,
                semantic_score: 0.0,
                keyword_score: 0.0,
                domain_score,
                final_score: domain_score,
            };
        }

        let semantic_score = features.profile.cosine_similarity(&entry.profile);
        let keyword_score = keyword_overlap(&features.words, &entry.keywords);
        let final_score = (SEMANTIC_WEIGHT * semantic_score
            + KEYWORD_WEIGHT * keyword_score
            + DOMAIN_WEIGHT * domain_score)
            .clamp(0.0, 1.0);

        ScoredEntry {
            index,
            semantic_score,
            keyword_score,
            domain_score,
            final_score,
        }
    }
}

/// Overlap normalized by the smaller side, so short descriptions are not
/// penalized against long queries (and vice versa). 0.0 when either side
/// is empty.
fn keyword_overlap(query_words: &HashSet<String>, entry_keywords: &[String]) -> f32 {
    if query_words.is_empty() || entry_keywords.is_empty() {
        return 0.0;
    }

    let overlap = entry_keywords
        .iter()
        .filter(|keyword| query_words.contains(keyword.as_str()))
        .count();
    let smaller = query_words.len().min(entry_keywords.len());

    (overlap as f32 / smaller as f32).clamp(0.0, 1.0)
}
