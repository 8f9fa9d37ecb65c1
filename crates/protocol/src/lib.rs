//! Shared data model for the technique retrieval engine.
//!
//! Records enter through an ingestion layer and results leave toward a
//! content-assembly layer; both sides speak the types in this crate. No
//! behavior lives here beyond validation and (de)serialization.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

mod config;

pub use config::{ConfigError, RetrievalConfig};

/// Category a technique record belongs to.
///
/// The set is closed: the scoring tables and coverage minimums are defined
/// over exactly these three values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Attack,
    Defense,
    Evaluation,
}

impl Category {
    /// All categories, in declaration order. Coverage backfill iterates in
    /// this order so selection stays deterministic.
    pub const ALL: [Category; 3] = [Category::Attack, Category::Defense, Category::Evaluation];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Attack => "attack",
            Category::Defense => "defense",
            Category::Evaluation => "evaluation",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the closed set.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "attack" => Some(Category::Attack),
            "defense" => Some(Category::Defense),
            "evaluation" => Some(Category::Evaluation),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// A technique record as supplied by the ingestion layer.
///
/// Read-only to the engine. Records are never deleted, only deactivated;
/// the index drops `active == false` records at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TechniqueRecord {
    /// Unique record id.
    pub id: String,

    /// Short technique name.
    pub name: String,

    /// Free-text description.
    pub description: String,

    pub category: Category,

    /// Identifier of the source document the technique came from.
    pub source_id: String,

    /// Estimated quality in [0, 1].
    #[serde(default = "default_quality_estimate")]
    pub quality_estimate: f32,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub complexity: Option<Complexity>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_quality_estimate() -> f32 {
    0.7
}

const fn default_active() -> bool {
    true
}

/// A retrieval query: what the caller wants, where, and with what context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Query {
    pub objective_text: String,

    #[serde(default)]
    pub domain_label: String,

    #[serde(default)]
    pub context_text: String,
}

impl Query {
    /// True when the query carries no usable text: both the objective and
    /// the context are empty or whitespace. Such a query is still served
    /// (domain-only scoring) but the result is flagged low-confidence.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.objective_text.trim().is_empty() && self.context_text.trim().is_empty()
    }
}

/// One selected entry, with its full score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectedTechnique {
    pub entry_id: String,
    pub name: String,
    pub category: Category,
    pub final_score: f32,
    pub semantic_score: f32,
    pub keyword_score: f32,
    pub domain_score: f32,
}

/// Aggregate counts over a selection, for logging and downstream reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionReport {
    /// Entries with final score above the high-relevance band (> 0.4).
    pub high_relevance: usize,

    /// Entries in the medium band (0.2, 0.4].
    pub medium_relevance: usize,

    /// Selected entries per category, keyed by `Category::as_str`.
    pub per_category: BTreeMap<String, usize>,

    /// Number of distinct source documents represented.
    pub distinct_sources: usize,
}

/// The ordered outcome of one retrieval call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionResult {
    /// Selected entries, best first.
    pub entries: Vec<SelectedTechnique>,

    /// Set when the query was unconstrained and scoring degraded to the
    /// domain factor alone.
    pub low_confidence: bool,

    pub report: SelectionReport,
}

impl SelectionResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
