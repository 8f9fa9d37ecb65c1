use crate::taxonomy::ConceptTaxonomy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Defensive cap on profiled text length, in chars. Anything beyond this
/// contributes nothing to the profile.
pub const MAX_PROFILE_CHARS: usize = 20_000;

const EXACT_MATCH_WEIGHT: f32 = 1.0;
const TRIGGER_WEIGHT: f32 = 0.7;

/// Sparse concept-weight vector. Weights lie in [0, 1]; zero weights are
/// not stored. Derived per text, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConceptProfile(BTreeMap<String, f32>);

impl ConceptProfile {
    #[must_use]
    pub fn weight(&self, concept: &str) -> f32 {
        self.0.get(concept).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(name, &weight)| (name.as_str(), weight))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cosine similarity over the stored (non-zero) concepts. Returns 0.0
    /// when either vector is all-zero.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        let dot: f32 = self
            .0
            .iter()
            .filter_map(|(concept, &weight)| other.0.get(concept).map(|&w| weight * w))
            .sum();

        let norm_a = norm(&self.0);
        let norm_b = norm(&other.0);
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

fn norm(weights: &BTreeMap<String, f32>) -> f32 {
    weights.values().map(|w| w * w).sum::<f32>().sqrt()
}

/// Turns free text into a [`ConceptProfile`] using an injected taxonomy.
///
/// Pure: the same text and taxonomy always produce the same profile.
#[derive(Debug, Clone)]
pub struct SemanticProfiler {
    taxonomy: ConceptTaxonomy,
}

impl SemanticProfiler {
    #[must_use]
    pub fn new(taxonomy: ConceptTaxonomy) -> Self {
        Self { taxonomy }
    }

    #[must_use]
    pub fn taxonomy(&self) -> &ConceptTaxonomy {
        &self.taxonomy
    }

    /// Profile a text. For each concept, non-overlapping substring
    /// occurrences of its triggers are summed (an exact concept-name
    /// match weighs 1.0, any other trigger 0.7), then normalized by the
    /// concept's trigger count and clamped to [0, 1].
    ///
    /// Empty text yields an all-zero profile; unknown words are ignored.
    #[must_use]
    pub fn profile(&self, text: &str) -> ConceptProfile {
        let lowered = truncate_chars(text, MAX_PROFILE_CHARS).to_lowercase();
        if lowered.trim().is_empty() {
            return ConceptProfile::default();
        }

        let mut weights = BTreeMap::new();
        for concept in self.taxonomy.concepts() {
            let mut score = 0.0f32;
            for trigger in concept.triggers() {
                let occurrences = lowered.matches(trigger.as_str()).count();
                if occurrences == 0 {
                    continue;
                }
                let importance = if trigger == concept.name() {
                    EXACT_MATCH_WEIGHT
                } else {
                    TRIGGER_WEIGHT
                };
                score += occurrences as f32 * importance;
            }

            if score > 0.0 {
                let normalized = (score / concept.triggers().len() as f32).min(1.0);
                weights.insert(concept.name().to_string(), normalized);
            }
        }

        ConceptProfile(weights)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
