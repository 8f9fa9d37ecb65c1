use crate::error::{Result, SemanticsError};
use serde::Deserialize;
use technique_protocol::Category;

/// Relevance when the matched domain lists the entry's category.
const COMPATIBLE_SCORE: f32 = 1.0;
/// Relevance when a domain matched but the category is not listed for it.
const INCOMPATIBLE_SCORE: f32 = 0.5;
/// Relevance when no domain rule matches the label at all.
const DEFAULT_SCORE: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq)]
struct DomainRule {
    key: String,
    categories: Vec<Category>,
}

/// Ordered domain -> compatible-categories table.
///
/// Lookup is a case-insensitive substring match of each rule key against
/// the query's domain label; the first matching rule wins, so rule order
/// is part of the table's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAffinity {
    rules: Vec<DomainRule>,
}

#[derive(Deserialize)]
struct DomainRuleFile {
    key: String,
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct DomainFile {
    #[serde(rename = "domain")]
    domains: Vec<DomainRuleFile>,
}

impl DomainAffinity {
    /// Build a table from ordered (key, categories) pairs.
    pub fn new(entries: Vec<(String, Vec<Category>)>) -> Result<Self> {
        let mut rules = Vec::with_capacity(entries.len());
        for (key, categories) in entries {
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                return Err(SemanticsError::EmptyDomainKey);
            }
            if categories.is_empty() {
                return Err(SemanticsError::EmptyDomainCategories(key));
            }
            rules.push(DomainRule { key, categories });
        }
        Ok(Self { rules })
    }

    /// Load an alternate table from TOML. Array-of-tables syntax keeps the
    /// first-match-wins order explicit:
    ///
    /// ```toml
    /// [[domain]]
    /// key = "ai safety"
    /// categories = ["attack", "defense", "evaluation"]
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: DomainFile =
            toml::from_str(raw).map_err(|e| SemanticsError::Malformed(e.to_string()))?;
        Self::new(
            file.domains
                .into_iter()
                .map(|rule| (rule.key, rule.categories))
                .collect(),
        )
    }

    /// The built-in domain table.
    #[must_use]
    pub fn builtin() -> Self {
        use Category::{Attack, Defense, Evaluation};

        let entries = vec![
            ("ai safety", vec![Attack, Defense, Evaluation]),
            ("machine learning", vec![Attack, Defense]),
            ("nlp", vec![Attack, Defense, Evaluation]),
            ("computer vision", vec![Attack, Defense]),
            ("cybersecurity", vec![Attack, Defense, Evaluation]),
        ];

        let entries = entries
            .into_iter()
            .map(|(key, categories)| (key.to_string(), categories))
            .collect();

        // The built-in table is statically well-formed.
        Self::new(entries).unwrap_or_else(|_| Self { rules: Vec::new() })
    }

    /// Score the affinity between a free-text domain label and a category.
    #[must_use]
    pub fn score(&self, domain_label: &str, category: Category) -> f32 {
        let label = domain_label.to_lowercase();
        for rule in &self.rules {
            if label.contains(&rule.key) {
                return if rule.categories.contains(&category) {
                    COMPATIBLE_SCORE
                } else {
                    INCOMPATIBLE_SCORE
                };
            }
        }
        DEFAULT_SCORE
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
