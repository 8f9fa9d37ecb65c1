use crate::error::{Result, SemanticsError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// A named concept with its trigger keywords.
///
/// Names and triggers are stored lower-cased; all matching is done against
/// lower-cased text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    name: String,
    triggers: Vec<String>,
}

impl Concept {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }
}

/// Immutable concept -> trigger-keywords table.
///
/// Built once at startup and injected into the profiler; a mutable global
/// would make profiles depend on call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptTaxonomy {
    concepts: Vec<Concept>,
}

#[derive(Deserialize)]
struct TaxonomyFile {
    concepts: BTreeMap<String, Vec<String>>,
}

impl ConceptTaxonomy {
    /// Build a taxonomy from (name, triggers) pairs. Rejects empty or
    /// duplicate names and empty trigger lists.
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut concepts = Vec::with_capacity(entries.len());

        for (name, triggers) in entries {
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                return Err(SemanticsError::EmptyConceptName);
            }
            if !seen.insert(name.clone()) {
                return Err(SemanticsError::DuplicateConcept(name));
            }
            let triggers: Vec<String> = triggers
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            if triggers.is_empty() {
                return Err(SemanticsError::EmptyTriggers(name));
            }
            concepts.push(Concept { name, triggers });
        }

        Ok(Self { concepts })
    }

    /// Load an alternate taxonomy from a TOML table:
    ///
    /// ```toml
    /// [concepts]
    /// adversarial = ["attack", "exploit", "perturbation"]
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: TaxonomyFile =
            toml::from_str(raw).map_err(|e| SemanticsError::Malformed(e.to_string()))?;
        Self::new(file.concepts.into_iter().collect())
    }

    /// The built-in research-topic taxonomy.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = vec![
            (
                "adversarial",
                vec![
                    "attack",
                    "adversarial",
                    "exploit",
                    "vulnerability",
                    "manipulation",
                    "perturbation",
                ],
            ),
            (
                "transformer",
                vec!["transformer", "attention", "bert", "gpt", "llm", "language model"],
            ),
            (
                "optimization",
                vec![
                    "optimization",
                    "gradient",
                    "backprop",
                    "descent",
                    "loss",
                    "training",
                ],
            ),
            (
                "robustness",
                vec![
                    "robustness",
                    "defense",
                    "security",
                    "protection",
                    "resilience",
                    "safety",
                ],
            ),
            (
                "jailbreak",
                vec!["jailbreak", "bypass", "circumvent", "override", "escape", "break"],
            ),
            (
                "prompt",
                vec!["prompt", "instruction", "query", "input", "text", "generation"],
            ),
            (
                "multimodal",
                vec!["multimodal", "vision", "image", "visual", "cross-modal", "vlm"],
            ),
            (
                "transfer",
                vec![
                    "transfer",
                    "transferability",
                    "generalization",
                    "cross-domain",
                    "portable",
                ],
            ),
            (
                "evaluation",
                vec![
                    "evaluation",
                    "assessment",
                    "measurement",
                    "metric",
                    "benchmark",
                    "test",
                ],
            ),
        ];

        let entries = entries
            .into_iter()
            .map(|(name, triggers)| {
                (
                    name.to_string(),
                    triggers.into_iter().map(String::from).collect(),
                )
            })
            .collect();

        // The built-in table is statically well-formed.
        Self::new(entries).unwrap_or_else(|_| Self { concepts: Vec::new() })
    }

    #[must_use]
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}
