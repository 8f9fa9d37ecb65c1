//! # Technique Semantics
//!
//! Text-to-features layer for technique retrieval.
//!
//! ## Pipeline
//!
//! ```text
//! Record / query text
//!     │
//!     ├──> Semantic Profiler (concept taxonomy)
//!     │      └─> Sparse concept-weight profile
//!     │
//!     ├──> Keyword Extractor (bounded, salience-ordered)
//!     │      └─> Top keywords
//!     │
//!     └──> Domain Affinity (domain label -> compatible categories)
//!            └─> Domain relevance factor
//! ```
//!
//! Everything here is a pure function over immutable tables. The built-in
//! tables come from [`ConceptTaxonomy::builtin`] and
//! [`DomainAffinity::builtin`]; callers may load alternates from TOML and
//! inject them instead.

mod domain;
mod error;
mod keywords;
mod profiler;
mod taxonomy;

pub use domain::DomainAffinity;
pub use error::{Result, SemanticsError};
pub use keywords::{extract_keywords, word_set, MAX_KEYWORDS};
pub use profiler::{ConceptProfile, SemanticProfiler, MAX_PROFILE_CHARS};
pub use taxonomy::{Concept, ConceptTaxonomy};
