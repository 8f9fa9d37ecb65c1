use crate::scorer::ScoredEntry;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use technique_indexer::CorpusIndex;
use technique_protocol::{
    Category, RetrievalConfig, SelectedTechnique, SelectionReport, SelectionResult,
};

/// High-relevance band: final score strictly above this.
const HIGH_TIER_THRESHOLD: f32 = 0.4;
/// Medium band: strictly above this, up to the high threshold.
const MEDIUM_TIER_THRESHOLD: f32 = 0.2;

/// Tiered, coverage-balanced selection.
///
/// Relevance fills the selection first (high band, then medium band, each
/// capped); category and source minimums backfill afterwards, so the
/// result cannot be dominated by near-duplicate top scorers from a single
/// category or source. Minimums win over `top_k`: truncation only removes
/// entries no minimum still needs.
pub struct CoverageSelector;

impl CoverageSelector {
    #[must_use]
    pub fn select(
        corpus: &CorpusIndex,
        scored: Vec<ScoredEntry>,
        config: &RetrievalConfig,
        low_confidence: bool,
    ) -> SelectionResult {
        let mut ranked = scored;
        // Stable: equal scores keep entry order, which keeps the whole
        // selection deterministic for a fixed snapshot and query.
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });

        let category_of =
            |entry: &ScoredEntry| corpus.entries()[entry.index].record.category;
        let source_of =
            |entry: &ScoredEntry| corpus.entries()[entry.index].record.source_id.as_str();

        let mut selected = vec![false; ranked.len()];

        // Tier A: high relevance, best first.
        let mut taken = 0;
        for (pos, entry) in ranked.iter().enumerate() {
            if taken >= config.high_tier_cap || entry.final_score <= HIGH_TIER_THRESHOLD {
                break;
            }
            selected[pos] = true;
            taken += 1;
        }

        // Tier B: medium relevance. The bands are disjoint, so nothing
        // here was already taken.
        let mut taken = 0;
        for (pos, entry) in ranked.iter().enumerate() {
            if taken >= config.medium_tier_cap {
                break;
            }
            if entry.final_score > HIGH_TIER_THRESHOLD {
                continue;
            }
            if entry.final_score <= MEDIUM_TIER_THRESHOLD {
                break;
            }
            if !selected[pos] {
                selected[pos] = true;
                taken += 1;
            }
        }

        // Tier C: coverage backfill, categories first, then sources.
        let minimums = config.category_minimums();
        for category in Category::ALL {
            let Some(&required) = minimums.get(&category) else {
                continue;
            };
            let available = ranked
                .iter()
                .filter(|entry| category_of(entry) == category)
                .count();
            let target = required.min(available);
            backfill(&mut selected, &ranked, target, |entry| {
                category_of(entry) == category
            });
        }

        // Distinct sources in ranked order, so backfill order is explicit.
        let mut seen_sources = HashSet::new();
        let mut source_order: Vec<String> = Vec::new();
        for entry in &ranked {
            let source = source_of(entry);
            if seen_sources.insert(source.to_string()) {
                source_order.push(source.to_string());
            }
        }
        for source in &source_order {
            let available = ranked
                .iter()
                .filter(|entry| source_of(entry) == source.as_str())
                .count();
            let target = config.min_per_source.min(available);
            backfill(&mut selected, &ranked, target, |entry| {
                source_of(entry) == source.as_str()
            });
        }

        let mut count = selected.iter().filter(|&&s| s).count();

        // Pad with the next best entries when the tiers and minimums left
        // the selection short of K.
        if count < config.top_k {
            for flag in selected.iter_mut() {
                if count >= config.top_k {
                    break;
                }
                if !*flag {
                    *flag = true;
                    count += 1;
                }
            }
        }

        // Truncate above K, lowest scores first, but never below a
        // minimum that the corpus can actually satisfy.
        if count > config.top_k {
            truncate_keeping_minimums(
                &mut selected,
                &ranked,
                corpus,
                config,
                &minimums,
                &mut count,
            );
        }

        let entries: Vec<SelectedTechnique> = ranked
            .iter()
            .zip(&selected)
            .filter(|(_, &keep)| keep)
            .map(|(entry, _)| {
                let record = &corpus.entries()[entry.index].record;
                SelectedTechnique {
                    entry_id: record.id.clone(),
                    name: record.name.clone(),
                    category: record.category,
                    final_score: entry.final_score,
                    semantic_score: entry.semantic_score,
                    keyword_score: entry.keyword_score,
                    domain_score: entry.domain_score,
                }
            })
            .collect();

        let report = build_report(corpus, &ranked, &selected);

        SelectionResult {
            entries,
            low_confidence,
            report,
        }
    }
}

/// Select highest-ranked unselected entries matching `predicate` until
/// `target` of them are in, or they run out.
fn backfill(
    selected: &mut [bool],
    ranked: &[ScoredEntry],
    target: usize,
    predicate: impl Fn(&ScoredEntry) -> bool,
) {
    let mut have = ranked
        .iter()
        .zip(selected.iter())
        .filter(|(entry, &sel)| sel && predicate(entry))
        .count();

    for (pos, entry) in ranked.iter().enumerate() {
        if have >= target {
            break;
        }
        if !selected[pos] && predicate(entry) {
            selected[pos] = true;
            have += 1;
        }
    }
}

fn truncate_keeping_minimums(
    selected: &mut [bool],
    ranked: &[ScoredEntry],
    corpus: &CorpusIndex,
    config: &RetrievalConfig,
    minimums: &BTreeMap<Category, usize>,
    count: &mut usize,
) {
    let category_of = |entry: &ScoredEntry| corpus.entries()[entry.index].record.category;
    let source_of =
        |entry: &ScoredEntry| corpus.entries()[entry.index].record.source_id.as_str();

    // A minimum only binds when the corpus can meet it in full; a source
    // (or category) with fewer entries than its configured minimum is not
    // "large enough to matter" and gives no protection.
    let mut category_available: BTreeMap<Category, usize> = BTreeMap::new();
    let mut source_available: HashMap<&str, usize> = HashMap::new();
    for entry in ranked {
        *category_available.entry(category_of(entry)).or_insert(0) += 1;
        *source_available.entry(source_of(entry)).or_insert(0) += 1;
    }
    let binding_category_min = |category: Category| {
        let required = minimums.get(&category).copied().unwrap_or(0);
        let available = category_available.get(&category).copied().unwrap_or(0);
        if available >= required {
            required
        } else {
            0
        }
    };
    let binding_source_min = |source: &str| {
        let available = source_available.get(source).copied().unwrap_or(0);
        if available >= config.min_per_source {
            config.min_per_source
        } else {
            0
        }
    };

    let mut category_counts: BTreeMap<Category, usize> = BTreeMap::new();
    let mut source_counts: HashMap<&str, usize> = HashMap::new();
    for (entry, &sel) in ranked.iter().zip(selected.iter()) {
        if sel {
            *category_counts.entry(category_of(entry)).or_insert(0) += 1;
            *source_counts.entry(source_of(entry)).or_insert(0) += 1;
        }
    }

    while *count > config.top_k {
        let removable = ranked
            .iter()
            .enumerate()
            .rev()
            .find(|(pos, entry)| {
                if !selected[*pos] {
                    return false;
                }
                let category = category_of(entry);
                let source = source_of(entry);
                category_counts[&category] > binding_category_min(category)
                    && source_counts[source] > binding_source_min(source)
            })
            .map(|(pos, _)| pos);

        // Everything left is carrying a minimum: K yields to coverage.
        let Some(pos) = removable else {
            break;
        };
        selected[pos] = false;
        *count -= 1;
        let entry = &ranked[pos];
        if let Some(n) = category_counts.get_mut(&category_of(entry)) {
            *n -= 1;
        }
        if let Some(n) = source_counts.get_mut(source_of(entry)) {
            *n -= 1;
        }
    }
}

fn build_report(
    corpus: &CorpusIndex,
    ranked: &[ScoredEntry],
    selected: &[bool],
) -> SelectionReport {
    let mut report = SelectionReport::default();
    let mut sources = HashSet::new();

    for (entry, &sel) in ranked.iter().zip(selected.iter()) {
        if !sel {
            continue;
        }
        let record = &corpus.entries()[entry.index].record;
        if entry.final_score > HIGH_TIER_THRESHOLD {
            report.high_relevance += 1;
        } else if entry.final_score > MEDIUM_TIER_THRESHOLD {
            report.medium_relevance += 1;
        }
        *report
            .per_category
            .entry(record.category.as_str().to_string())
            .or_insert(0) += 1;
        if sources.insert(record.source_id.as_str()) {
            report.distinct_sources += 1;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use technique_protocol::TechniqueRecord;
    use technique_semantics::{ConceptTaxonomy, SemanticProfiler};

    fn record(id: &str, category: Category, source_id: &str) -> TechniqueRecord {
        TechniqueRecord {
            id: id.to_string(),
            name: format!("technique {id}"),
            description: String::new(),
            category,
            source_id: source_id.to_string(),
            quality_estimate: 0.7,
            priority: None,
            complexity: None,
            active: true,
        }
    }

    fn corpus(records: &[TechniqueRecord]) -> CorpusIndex {
        let profiler = SemanticProfiler::new(ConceptTaxonomy::builtin());
        CorpusIndex::build(records, &profiler)
    }

    fn scored(index: usize, final_score: f32) -> ScoredEntry {
        ScoredEntry {
            index,
            semantic_score: final_score,
            keyword_score: final_score,
            domain_score: final_score,
            final_score,
        }
    }

    fn config(
        top_k: usize,
        min_per_category: &[(&str, usize)],
        min_per_source: usize,
    ) -> RetrievalConfig {
        RetrievalConfig {
            top_k,
            min_per_category: min_per_category
                .iter()
                .map(|(name, min)| (name.to_string(), *min))
                .collect(),
            min_per_source,
            ..RetrievalConfig::default()
        }
    }

    fn selected_ids(result: &SelectionResult) -> Vec<&str> {
        result.entries.iter().map(|e| e.entry_id.as_str()).collect()
    }

    #[test]
    fn category_minimums_backfill_past_low_scores() {
        // Example from the selection contract: 3 attack entries (0.6,
        // 0.3, 0.1) and 2 defense entries (0.5, 0.2), K = 4, minimums
        // attack >= 1 and defense >= 2.
        let records = vec![
            record("a-1", Category::Attack, "s-1"),
            record("a-2", Category::Attack, "s-1"),
            record("a-3", Category::Attack, "s-1"),
            record("d-1", Category::Defense, "s-1"),
            record("d-2", Category::Defense, "s-1"),
        ];
        let index = corpus(&records);
        let scores = vec![
            scored(0, 0.6),
            scored(1, 0.3),
            scored(2, 0.1),
            scored(3, 0.5),
            scored(4, 0.2),
        ];

        let result = CoverageSelector::select(
            &index,
            scores,
            &config(4, &[("attack", 1), ("defense", 2)], 0),
            false,
        );

        assert_eq!(selected_ids(&result), vec!["a-1", "d-1", "a-2", "d-2"]);
        assert_eq!(result.report.per_category.get("attack"), Some(&2));
        assert_eq!(result.report.per_category.get("defense"), Some(&2));
    }

    #[test]
    fn empty_corpus_selects_nothing() {
        let index = corpus(&[]);
        let result =
            CoverageSelector::select(&index, Vec::new(), &RetrievalConfig::default(), false);
        assert!(result.is_empty());
        assert_eq!(result.report, SelectionReport::default());
    }

    #[test]
    fn high_tier_is_capped() {
        let records: Vec<TechniqueRecord> = (0..12)
            .map(|i| record(&format!("a-{i}"), Category::Attack, "s-1"))
            .collect();
        let index = corpus(&records);
        let scores: Vec<ScoredEntry> = (0..12).map(|i| scored(i, 0.9 - i as f32 * 0.01)).collect();

        let cfg = RetrievalConfig {
            top_k: 20,
            high_tier_cap: 8,
            medium_tier_cap: 4,
            min_per_category: BTreeMap::new(),
            min_per_source: 0,
        };
        let result = CoverageSelector::select(&index, scores, &cfg, false);

        // 8 from the high tier, none medium; padding then fills to the
        // corpus size since top_k exceeds it.
        assert_eq!(result.len(), 12);
        assert_eq!(result.report.high_relevance, 12);
    }

    #[test]
    fn ties_keep_entry_order() {
        let records = vec![
            record("a-1", Category::Attack, "s-1"),
            record("a-2", Category::Attack, "s-1"),
            record("a-3", Category::Attack, "s-1"),
        ];
        let index = corpus(&records);
        let scores = vec![scored(0, 0.5), scored(1, 0.5), scored(2, 0.5)];

        let result =
            CoverageSelector::select(&index, scores, &config(3, &[], 0), false);
        assert_eq!(selected_ids(&result), vec!["a-1", "a-2", "a-3"]);
    }

    #[test]
    fn source_minimums_pull_in_underrepresented_sources() {
        let records = vec![
            record("a-1", Category::Attack, "s-1"),
            record("a-2", Category::Attack, "s-1"),
            record("a-3", Category::Attack, "s-1"),
            record("b-1", Category::Attack, "s-2"),
            record("b-2", Category::Attack, "s-2"),
        ];
        let index = corpus(&records);
        let scores = vec![
            scored(0, 0.9),
            scored(1, 0.8),
            scored(2, 0.7),
            scored(3, 0.1),
            scored(4, 0.05),
        ];

        let result = CoverageSelector::select(&index, scores, &config(5, &[], 2), false);

        // Both s-2 entries are backfilled despite their low scores.
        assert_eq!(
            selected_ids(&result),
            vec!["a-1", "a-2", "a-3", "b-1", "b-2"]
        );
        assert_eq!(result.report.distinct_sources, 2);
    }

    #[test]
    fn truncation_prefers_entries_no_minimum_needs() {
        let records = vec![
            record("a-1", Category::Attack, "s-1"),
            record("a-2", Category::Attack, "s-1"),
            record("a-3", Category::Attack, "s-1"),
            record("d-1", Category::Defense, "s-1"),
            record("d-2", Category::Defense, "s-1"),
        ];
        let index = corpus(&records);
        let scores = vec![
            scored(0, 0.9),
            scored(1, 0.8),
            scored(2, 0.7),
            scored(3, 0.3),
            scored(4, 0.25),
        ];

        // Defense minimum of 2 forces both low scorers in; K = 3 then
        // drops attack entries, never the defense carriers.
        let result = CoverageSelector::select(
            &index,
            scores,
            &config(3, &[("defense", 2)], 0),
            false,
        );

        assert_eq!(selected_ids(&result), vec!["a-1", "d-1", "d-2"]);
    }

    #[test]
    fn minimums_win_over_top_k_when_nothing_is_removable() {
        let records = vec![
            record("a-1", Category::Attack, "s-1"),
            record("d-1", Category::Defense, "s-1"),
            record("d-2", Category::Defense, "s-1"),
        ];
        let index = corpus(&records);
        let scores = vec![scored(0, 0.9), scored(1, 0.3), scored(2, 0.25)];

        let result = CoverageSelector::select(
            &index,
            scores,
            &config(1, &[("attack", 1), ("defense", 2)], 0),
            false,
        );

        // K = 1 but every entry carries a minimum.
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn unsatisfiable_minimums_do_not_block_truncation() {
        // Sources with a single entry each cannot meet min_per_source = 2,
        // so they give no truncation protection.
        let records: Vec<TechniqueRecord> = (0..6)
            .map(|i| record(&format!("a-{i}"), Category::Attack, &format!("s-{i}")))
            .collect();
        let index = corpus(&records);
        let scores: Vec<ScoredEntry> =
            (0..6).map(|i| scored(i, 0.6 - i as f32 * 0.05)).collect();

        let result = CoverageSelector::select(&index, scores, &config(4, &[], 2), false);
        assert_eq!(result.len(), 4);
        assert_eq!(selected_ids(&result), vec!["a-0", "a-1", "a-2", "a-3"]);
    }

    #[test]
    fn report_counts_match_entries() {
        let records = vec![
            record("a-1", Category::Attack, "s-1"),
            record("d-1", Category::Defense, "s-2"),
            record("e-1", Category::Evaluation, "s-2"),
        ];
        let index = corpus(&records);
        let scores = vec![scored(0, 0.8), scored(1, 0.3), scored(2, 0.1)];

        let result = CoverageSelector::select(&index, scores, &config(3, &[], 0), false);

        assert_eq!(result.len(), 3);
        assert_eq!(result.report.high_relevance, 1);
        assert_eq!(result.report.medium_relevance, 1);
        assert_eq!(result.report.distinct_sources, 2);
        assert_eq!(result.report.per_category.get("evaluation"), Some(&1));
    }
}
