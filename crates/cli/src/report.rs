use std::fmt::Write as _;
use technique_indexer::IndexStats;
use technique_protocol::SelectionResult;
use technique_semantics::ConceptProfile;

/// Rank table for a selection, one line per entry, best first.
pub fn render_selection(result: &SelectionResult) -> String {
    let mut out = String::new();

    if result.is_empty() {
        out.push_str("no techniques selected\n");
        return out;
    }

    if result.low_confidence {
        out.push_str("note: query had no objective/context text; domain-only ranking (low confidence)\n");
    }

    let _ = writeln!(
        out,
        "{:>3}  {:>5}  {:>5}  {:>5}  {:>5}  {:<10}  {:<12}  NAME",
        "#", "FINAL", "SEM", "KW", "DOM", "CATEGORY", "ID"
    );
    for (rank, entry) in result.entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:>5.3}  {:>5.3}  {:>5.3}  {:>5.3}  {:<10}  {:<12}  {}",
            rank + 1,
            entry.final_score,
            entry.semantic_score,
            entry.keyword_score,
            entry.domain_score,
            entry.category.as_str(),
            entry.entry_id,
            entry.name
        );
    }

    let report = &result.report;
    let _ = writeln!(
        out,
        "{} selected ({} high, {} medium) across {} sources",
        result.len(),
        report.high_relevance,
        report.medium_relevance,
        report.distinct_sources
    );

    out
}

/// Concept weights (descending) and keywords for one text.
pub fn render_profile(profile: &ConceptProfile, keywords: &[String]) -> String {
    let mut out = String::new();

    if profile.is_zero() {
        out.push_str("no concepts triggered\n");
    } else {
        let mut weights: Vec<(&str, f32)> = profile.iter().collect();
        weights.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (concept, weight) in weights {
            let _ = writeln!(out, "{weight:>6.3}  {concept}");
        }
    }

    if keywords.is_empty() {
        out.push_str("keywords: (none)\n");
    } else {
        let _ = writeln!(out, "keywords: {}", keywords.join(", "));
    }

    out
}

pub fn render_stats(stats: &IndexStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "indexed {} of {} records ({} inactive skipped) in {}ms",
        stats.indexed, stats.total_records, stats.skipped_inactive, stats.time_ms
    );
    for (category, count) in &stats.per_category {
        let _ = writeln!(out, "  {category:<12} {count}");
    }
    let _ = writeln!(out, "  {:<12} {}", "sources", stats.distinct_sources);
    out
}
