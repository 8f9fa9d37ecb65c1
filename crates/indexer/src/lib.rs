//! # Technique Indexer
//!
//! Corpus indexing for technique retrieval.
//!
//! ## Pipeline
//!
//! ```text
//! Technique records
//!     │
//!     ├──> Active filter (active == false is dropped)
//!     │
//!     ├──> Semantic Profiler (name + description)
//!     │      └─> Concept profile per record
//!     │
//!     └──> Keyword Extractor
//!            └─> Top keywords per record
//! ```
//!
//! The result is an immutable [`CorpusIndex`] snapshot. There is no
//! incremental update path: a changed corpus means a full rebuild, and a
//! concurrent host swaps the fresh index in behind an `Arc`.

mod index;
mod stats;

pub use index::{CorpusIndex, IndexedEntry};
pub use stats::IndexStats;
