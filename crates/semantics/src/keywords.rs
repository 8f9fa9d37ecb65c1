use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Upper bound on extracted keywords per text.
pub const MAX_KEYWORDS: usize = 15;

// Alphabetic tokens of length >= 4, bounded so runs glued to digits or
// underscores (e.g. "gpt4") are not split into false keywords.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z]{4,}\b").expect("static regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "that", "this", "with", "from", "they", "have", "been", "were", "will", "would",
        "could", "should",
    ]
    .into_iter()
    .collect()
});

/// Extract a bounded, salience-ordered keyword list from a text.
///
/// Tokens are lower-cased, stop words dropped, duplicates removed keeping
/// first-seen order, then stable-sorted by descending length and capped at
/// [`MAX_KEYWORDS`]. Length is a documented stand-in for TF-IDF; the
/// contract is only "bounded, salience-ordered token list".
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut seen = HashSet::new();
    let mut keywords: Vec<String> = Vec::new();
    for token in WORD.find_iter(&lowered) {
        let word = token.as_str();
        if STOP_WORDS.contains(word) {
            continue;
        }
        if seen.insert(word.to_string()) {
            keywords.push(word.to_string());
        }
    }

    // Stable sort: equal-length tokens keep first-seen order.
    keywords.sort_by_key(|w| std::cmp::Reverse(w.len()));
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// The full (uncapped) lower-cased word set of a text. Used for the query
/// side of keyword-overlap scoring, where capping would punish long
/// context passages.
#[must_use]
pub fn word_set(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|token| token.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_short_tokens_and_stop_words() {
        let keywords = extract_keywords("We probe LLM and see that this fails");
        assert_eq!(keywords, vec!["probe".to_string(), "fails".to_string()]);
    }

    #[test]
    fn longest_tokens_rank_first() {
        let keywords = extract_keywords("token perturbation search");
        assert_eq!(
            keywords,
            vec![
                "perturbation".to_string(),
                "search".to_string(),
                "token".to_string()
            ]
        );
    }

    #[test]
    fn equal_length_ties_keep_first_seen_order() {
        let keywords = extract_keywords("delta gamma alpha");
        assert_eq!(
            keywords,
            vec!["delta".to_string(), "gamma".to_string(), "alpha".to_string()]
        );
    }

    #[test]
    fn deduplicates_case_insensitively() {
        let keywords = extract_keywords("Attack attack ATTACK surface");
        assert_eq!(keywords, vec!["surface".to_string(), "attack".to_string()]);
    }

    #[test]
    fn caps_at_fifteen() {
        let text = (0..40u8)
            .map(|i| {
                format!(
                    "keyword{}{}",
                    char::from(b'a' + i / 26),
                    char::from(b'a' + i % 26)
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = extract_keywords(&text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
    }

    #[test]
    fn tokens_glued_to_digits_are_not_keywords() {
        let keywords = extract_keywords("gpt4 wins over word2vec");
        assert_eq!(keywords, vec!["wins".to_string(), "over".to_string()]);
    }

    #[test]
    fn empty_text_yields_empty_outputs() {
        assert!(extract_keywords("").is_empty());
        assert!(word_set("").is_empty());
    }

    #[test]
    fn word_set_is_uncapped_and_keeps_stop_words() {
        let text = (0..40)
            .map(|i| format!("tok{}{}", char::from(b'a' + (i / 26) as u8), char::from(b'a' + (i % 26) as u8)))
            .collect::<Vec<_>>()
            .join(" ");
        let words = word_set(&text);
        assert_eq!(words.len(), 40);
        assert!(word_set("words that linger").contains("that"));
    }
}
