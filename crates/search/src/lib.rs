//! # Technique Search
//!
//! Ranking and coverage-balanced selection over an indexed technique
//! corpus.
//!
//! ## Pipeline
//!
//! ```text
//! Query
//!     │
//!     ├──> Query features (profile + word set, once per retrieval)
//!     │
//!     ├──> Relevance scorer (semantic / keyword / domain blend)
//!     │      └─> Scored entries
//!     │
//!     └──> Coverage selector (tiers + category/source backfill)
//!            └─> SelectionResult
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use technique_protocol::{Query, RetrievalConfig, TechniqueRecord};
//! use technique_search::RetrievalEngine;
//!
//! fn main() -> technique_search::Result<()> {
//!     let engine = RetrievalEngine::new(RetrievalConfig::default())?;
//!     let records: Vec<TechniqueRecord> = Vec::new();
//!     let index = engine.build_index(&records);
//!
//!     let query = Query {
//!         objective_text: "evaluate prompt injection robustness".to_string(),
//!         domain_label: "ai safety".to_string(),
//!         context_text: String::new(),
//!     };
//!     let result = engine.retrieve(&index, &query);
//!     println!("selected {} techniques", result.len());
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod scorer;
mod selector;

pub use engine::RetrievalEngine;
pub use error::{Result, SearchError};
pub use scorer::{QueryFeatures, RelevanceScorer, ScoredEntry};
pub use selector::CoverageSelector;
