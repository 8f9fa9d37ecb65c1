use crate::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    #[error("min_per_category references unknown category `{name}` (known: attack, defense, evaluation)")]
    UnknownCategory { name: String },

    #[error("malformed retrieval config: {0}")]
    Malformed(String),
}

/// Tunables for one retrieval call.
///
/// `min_per_category` is string-keyed so that a config file referencing a
/// category outside the closed set is representable, and rejected by
/// [`RetrievalConfig::validate`], instead of being silently dropped
/// during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Target selection size. Minimums may push the result above this;
    /// see the selector's truncation policy.
    pub top_k: usize,

    /// Cap on entries taken from the high-relevance band (> 0.4).
    pub high_tier_cap: usize,

    /// Cap on entries taken from the medium band (0.2, 0.4].
    pub medium_tier_cap: usize,

    /// Coverage minimum per category, applied only up to what the corpus
    /// actually contains.
    pub min_per_category: BTreeMap<String, usize>,

    /// Coverage minimum per distinct source id, same capping.
    pub min_per_source: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        let mut min_per_category = BTreeMap::new();
        min_per_category.insert("attack".to_string(), 8);
        min_per_category.insert("defense".to_string(), 5);
        min_per_category.insert("evaluation".to_string(), 3);

        Self {
            top_k: 12,
            high_tier_cap: 8,
            medium_tier_cap: 4,
            min_per_category,
            min_per_source: 2,
        }
    }
}

impl RetrievalConfig {
    /// Parse a TOML config and validate it in one step.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on an unusable config, before any scoring happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::NonPositive { field: "top_k" });
        }
        if self.high_tier_cap == 0 {
            return Err(ConfigError::NonPositive {
                field: "high_tier_cap",
            });
        }
        if self.medium_tier_cap == 0 {
            return Err(ConfigError::NonPositive {
                field: "medium_tier_cap",
            });
        }
        for name in self.min_per_category.keys() {
            if Category::parse(name).is_none() {
                return Err(ConfigError::UnknownCategory { name: name.clone() });
            }
        }
        Ok(())
    }

    /// The category minimums as typed keys. Only meaningful after
    /// [`validate`](Self::validate); unparseable keys are skipped.
    #[must_use]
    pub fn category_minimums(&self) -> BTreeMap<Category, usize> {
        self.min_per_category
            .iter()
            .filter_map(|(name, &min)| Category::parse(name).map(|c| (c, min)))
            .collect()
    }
}
