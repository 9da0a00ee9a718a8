use std::sync::LazyLock;

use regex::Regex;

use crate::tokenize::tokenize;
use crate::vocabulary::Vocabulary;

/// Quantity followed by a measurement or temperature unit, e.g. "2 cups",
/// "1/2 tsp", "350 degrees".
static QUANTITY_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)\b\d+(?:[/.]\d+)?\s*
          (?:cups?|tablespoons?|tbsp|teaspoons?|tsp|pounds?|lbs?|ounces?|oz
          |grams?|kg|ml|liters?|quarts?|pints?|gallons?|cans?|packages?|degrees?)\b",
    )
    .expect("quantity/unit pattern is valid")
});

/// Duration phrase, e.g. "for 20 minutes", "about 1 hour".
static TIME_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(?:[/.]\d+)?\s*(?:minutes?|mins?|hours?|hrs?|seconds?|secs?)\b")
        .expect("time pattern is valid")
});

/// Leading imperative phrase, e.g. "stir in the flour", "bring to a boil".
static LEADING_VERB_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[a-z]+\s+(?:the|a|an|in|into|to|until|over|with|all|each)\b")
        .expect("verb phrase pattern is valid")
});

/// Leading quantity and optional measurement words, e.g. the "2 cloves " in
/// "2 cloves garlic" or the "1 1/2 cups of " in "1 1/2 cups of flour".
static QUANTITY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)^\s*
          (?:\d+(?:[/.]\d+)?\s*)+                      # 2, 1/2, 1 1/2, 2.5
          (?:(?:cups?|tablespoons?|tbsp|teaspoons?|tsp|pounds?|lbs?|ounces?|oz
          |grams?|kg|ml|liters?|cans?|packages?|cloves?|heads?|bulbs?|stalks?
          |sprigs?|bunches?|slices?|pieces?|strips?|pinch(?:es)?|dash(?:es)?)(?:\s+|$))?
          (?:of\s+)?",
    )
    .expect("quantity prefix pattern is valid")
});

/// Result of splitting a token sequence into identity-bearing base tokens
/// and lemmatized form-modifier tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub base_tokens: Vec<String>,
    pub form_tokens: Vec<String>,
}

impl Classification {
    /// Grouping key: sorted base tokens and sorted form tokens.
    ///
    /// Two phrases with the same key name the same ingredient in the same
    /// form, regardless of word order ("garlic, minced" vs "minced garlic").
    pub fn cluster_key(&self) -> String {
        Self::key_of(&self.base_tokens, &self.form_tokens)
    }

    /// Key ignoring form modifiers, used for base-level matching.
    pub fn base_key(&self) -> String {
        Self::key_of(&self.base_tokens, &[])
    }

    fn key_of(base: &[String], form: &[String]) -> String {
        let join_sorted = |tokens: &[String], empty: &str| {
            if tokens.is_empty() {
                empty.to_string()
            } else {
                let mut sorted: Vec<&str> = tokens.iter().map(String::as_str).collect();
                sorted.sort_unstable();
                sorted.join("+")
            }
        };
        format!(
            "{}|{}",
            join_sorted(base, "_empty_"),
            join_sorted(form, "base")
        )
    }
}

/// Lemma & form-modifier classifier over a fixed vocabulary.
///
/// Stateless apart from the injected `Vocabulary`; all methods are pure.
#[derive(Debug, Clone)]
pub struct Classifier {
    vocab: Vocabulary,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

impl Classifier {
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Split tokens into base (identity) and form (modifier) tokens.
    ///
    /// Form modifiers are lemmatized; measurement words are dropped from
    /// the base entirely.
    pub fn classify(&self, tokens: &[String]) -> Classification {
        let mut base_tokens = Vec::new();
        let mut form_tokens = Vec::new();

        for token in tokens {
            let lemma = self.vocab.lemmatize(token);
            if self.vocab.form_modifiers.contains(token.as_str())
                || self.vocab.form_modifiers.contains(lemma)
            {
                form_tokens.push(lemma.to_string());
            } else if !self.vocab.unit_words.contains(token.as_str()) {
                base_tokens.push(token.clone());
            }
        }

        Classification {
            base_tokens,
            form_tokens,
        }
    }

    /// Classify raw text in one step.
    pub fn classify_text(&self, text: &str) -> Classification {
        self.classify(&tokenize(text))
    }

    /// True when the text reads like a recipe direction rather than an
    /// ingredient: a leading step verb, an imperative phrase, or an embedded
    /// quantity/time measurement.
    pub fn is_instruction(&self, text: &str) -> bool {
        let tokens = tokenize(text);
        if let Some(first) = tokens.first() {
            if self.vocab.instruction_verbs.contains(first.as_str()) {
                return true;
            }
        }

        let lowered = text.to_lowercase();
        LEADING_VERB_PHRASE.is_match(&lowered)
            || QUANTITY_UNIT.is_match(&lowered)
            || TIME_PHRASE.is_match(&lowered)
    }

    /// True when the tokens name a manufactured product ("garlic bread")
    /// that must not merge into its base ingredient's cluster.
    pub fn is_compound_product(&self, tokens: &[String]) -> bool {
        tokens.len() >= 2
            && tokens
                .iter()
                .any(|t| self.vocab.product_type_nouns.contains(t.as_str()))
    }

    /// Strip a leading quantity/unit phrase from raw ingredient text.
    ///
    /// "2 cloves garlic, minced" becomes "garlic, minced". Returns the input
    /// unchanged when no prefix matches or stripping would empty it.
    pub fn strip_quantity_prefix<'a>(&self, text: &'a str) -> &'a str {
        match QUANTITY_PREFIX.find(text) {
            Some(m) if m.end() > 0 => {
                let rest = &text[m.end()..];
                if rest.trim().is_empty() { text } else { rest }
            }
            _ => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::default()
    }

    #[test]
    fn test_classify_splits_base_and_form() {
        let c = classifier();
        let result = c.classify_text("garlic, minced");
        assert_eq!(result.base_tokens, vec!["garlic"]);
        assert_eq!(result.form_tokens, vec!["mince"]);
    }

    #[test]
    fn test_classify_drops_unit_words() {
        let c = classifier();
        let result = c.classify_text("2 cloves garlic");
        assert_eq!(result.base_tokens, vec!["garlic"]);
        assert!(result.form_tokens.is_empty());
    }

    #[test]
    fn test_cluster_key_order_independent() {
        let c = classifier();
        let a = c.classify_text("garlic, minced");
        let b = c.classify_text("minced garlic");
        assert_eq!(a.cluster_key(), b.cluster_key());
        assert_eq!(a.cluster_key(), "garlic|mince");
    }

    #[test]
    fn test_cluster_key_placeholders() {
        let c = classifier();
        let bare = c.classify_text("garlic");
        assert_eq!(bare.cluster_key(), "garlic|base");

        let empty = c.classify(&[]);
        assert_eq!(empty.cluster_key(), "_empty_|base");
    }

    #[test]
    fn test_base_key_ignores_form() {
        let c = classifier();
        let result = c.classify_text("fresh chopped basil");
        assert_eq!(result.base_key(), "basil|base");
    }

    #[test]
    fn test_is_instruction_leading_verb() {
        let c = classifier();
        assert!(c.is_instruction("preheat oven"));
        assert!(c.is_instruction("stir in the flour"));
        assert!(!c.is_instruction("garlic, minced"));
    }

    #[test]
    fn test_is_instruction_quantity_and_time() {
        let c = classifier();
        assert!(c.is_instruction("simmer for 20 minutes"));
        assert!(c.is_instruction("use 2 cups water"));
        assert!(!c.is_instruction("chicken breast"));
    }

    #[test]
    fn test_is_compound_product() {
        let c = classifier();
        assert!(c.is_compound_product(&tokenize("garlic bread")));
        assert!(c.is_compound_product(&tokenize("soy sauce")));
        // A bare product noun is an ingredient, not a compound
        assert!(!c.is_compound_product(&tokenize("bread")));
        assert!(!c.is_compound_product(&tokenize("minced garlic")));
    }

    #[test]
    fn test_strip_quantity_prefix() {
        let c = classifier();
        assert_eq!(c.strip_quantity_prefix("2 cloves garlic, minced"), "garlic, minced");
        assert_eq!(c.strip_quantity_prefix("1 1/2 cups of flour"), "flour");
        assert_eq!(c.strip_quantity_prefix("garlic"), "garlic");
        // Never strip down to nothing
        assert_eq!(c.strip_quantity_prefix("2 cups"), "2 cups");
    }

    #[test]
    fn test_injected_vocabulary() {
        let mut vocab = Vocabulary::default();
        vocab.form_modifiers.insert("heirloom".to_string());
        let c = Classifier::new(vocab);
        let result = c.classify_text("heirloom tomato");
        assert_eq!(result.form_tokens, vec!["heirloom"]);
        assert_eq!(result.base_tokens, vec!["tomato"]);
    }
}
