use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_224};
use thiserror::Error;
use time::OffsetDateTime;

use cookdex_lexicon::{slugify, tokenize};

/// Bumped whenever strip rules change; gates idempotent backfill re-runs.
pub const CANONICAL_VERSION: u32 = 3;

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("empty description for fdc_id {0}")]
    EmptyDescription(i64),

    #[error("no identity tokens left in '{description}' for fdc_id {fdc_id}")]
    NoIdentityTokens { fdc_id: i64, description: String },
}

/// Resolution level of a canonical name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NameLevel {
    /// Identity after stripping all processing/preparation modifiers.
    Base,
    /// Identity retaining identity-relevant (non-process-only) modifiers.
    Specific,
}

/// One row of the canonical name table, keyed (fdc_id, level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalName {
    pub fdc_id: i64,
    pub level: NameLevel,
    pub canonical_name: String,
    pub canonical_slug: String,
    pub removed_tokens: Vec<String>,
    pub kept_tokens: Vec<String>,
    pub description_hash: String,
    pub canonical_version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub assessed_at: OffsetDateTime,
}

/// One ordered row of the token-strip table: a named token class, its word
/// list, and whether the class is stripped at each level.
///
/// Adding a resolution level means adding a column here, not new branching.
#[derive(Debug, Clone, Copy)]
pub struct StripRule {
    pub class: &'static str,
    pub words: &'static [&'static str],
    pub strip_at_base: bool,
    pub strip_at_specific: bool,
}

/// Built-in strip table. Base strips every class; specific keeps the
/// cut/processing class because those modifiers carry identity
/// ("smoked salmon" is not "salmon").
const STRIP_RULES: &[StripRule] = &[
    StripRule {
        class: "measurement",
        words: &[
            "clove", "cloves", "head", "heads", "bulb", "bulbs", "stalk", "stalks", "leaf",
            "leaves", "sprig", "sprigs", "bunch", "bunches", "rib", "ribs", "ear", "ears",
            "strip", "strips", "piece", "pieces", "slice", "slices", "cup", "cups", "oz",
            "ounce", "ounces", "lb", "pound", "pounds", "serving", "servings",
        ],
        strip_at_base: true,
        strip_at_specific: true,
    },
    StripRule {
        class: "preparation_state",
        words: &[
            "raw", "cooked", "uncooked", "prepared", "unprepared", "blanched", "heated",
            "unheated", "melted", "softened", "drained", "rinsed",
        ],
        strip_at_base: true,
        strip_at_specific: true,
    },
    StripRule {
        class: "size",
        words: &[
            "large", "medium", "small", "baby", "mini", "jumbo", "thin", "thick", "extra",
        ],
        strip_at_base: true,
        strip_at_specific: true,
    },
    StripRule {
        class: "quality",
        words: &[
            "organic", "natural", "pure", "real", "imitation", "premium", "fancy", "grade",
            "enriched", "fortified", "unenriched",
        ],
        strip_at_base: true,
        strip_at_specific: true,
    },
    StripRule {
        class: "packaging",
        words: &[
            "packaged", "bottled", "jarred", "bagged", "boxed", "refrigerated", "shelf-stable",
            "store-bought", "commercial", "homemade", "restaurant",
        ],
        strip_at_base: true,
        strip_at_specific: true,
    },
    StripRule {
        class: "cut_or_processing",
        words: &[
            "boneless", "skinless", "bone-in", "skin-on", "ground", "minced", "chopped",
            "diced", "sliced", "shredded", "grated", "crushed", "whole", "halved",
            "quartered", "cubed", "mashed", "pureed", "peeled", "seeded", "pitted",
            "powdered", "granulated", "flaked", "fresh", "frozen", "canned", "dried", "dry",
            "pickled", "smoked", "cured", "roasted", "toasted", "salted", "unsalted",
            "sweetened", "unsweetened", "low-fat", "nonfat", "reduced-fat", "fat-free",
            "low-sodium", "lean",
        ],
        strip_at_base: true,
        strip_at_specific: false,
    },
];

/// Derives the two canonical name rows for a food description.
///
/// Pure and versioned: the same (description, canonical_version) always
/// yields byte-identical names, slugs and token lists.
#[derive(Debug, Clone)]
pub struct Deriver {
    rules: &'static [StripRule],
}

impl Default for Deriver {
    fn default() -> Self {
        Self { rules: STRIP_RULES }
    }
}

impl Deriver {
    /// Stable content hash of the raw description, used to skip unchanged
    /// foods on re-runs.
    pub fn description_hash(description: &str) -> String {
        let mut hasher = Sha3_224::default();
        hasher.update(description.as_bytes());
        STANDARD.encode(hasher.finalize())
    }

    /// Derive the base and specific rows for one food.
    pub fn derive(
        &self,
        fdc_id: i64,
        description: &str,
        assessed_at: OffsetDateTime,
    ) -> Result<[CanonicalName; 2], DeriveError> {
        if description.trim().is_empty() {
            return Err(DeriveError::EmptyDescription(fdc_id));
        }

        let tokens = tokenize(description);
        if tokens.is_empty() {
            return Err(DeriveError::NoIdentityTokens {
                fdc_id,
                description: description.to_string(),
            });
        }

        let hash = Self::description_hash(description);

        // A description made entirely of base-strippable modifiers has no
        // identity to keep. Both levels then fall back to the full token
        // list together, so base removals stay a superset of specific's
        // even when some tokens would survive at the specific level.
        let (base_split, specific_split) = match self.split(&tokens, NameLevel::Base) {
            (kept, _) if kept.is_empty() => {
                ((tokens.clone(), Vec::new()), (tokens.clone(), Vec::new()))
            }
            base_split => (base_split, self.split(&tokens, NameLevel::Specific)),
        };

        let base = self.build_row(fdc_id, NameLevel::Base, base_split, &hash, assessed_at)?;
        let specific =
            self.build_row(fdc_id, NameLevel::Specific, specific_split, &hash, assessed_at)?;

        debug_assert!(
            specific
                .removed_tokens
                .iter()
                .all(|t| base.removed_tokens.contains(t)),
            "base must remove a superset of specific's removals"
        );

        Ok([base, specific])
    }

    fn split(&self, tokens: &[String], level: NameLevel) -> (Vec<String>, Vec<String>) {
        let mut kept = Vec::new();
        let mut removed = Vec::new();
        for token in tokens {
            if self.strips(token, level) {
                removed.push(token.clone());
            } else {
                kept.push(token.clone());
            }
        }
        (kept, removed)
    }

    fn build_row(
        &self,
        fdc_id: i64,
        level: NameLevel,
        (kept, removed): (Vec<String>, Vec<String>),
        description_hash: &str,
        assessed_at: OffsetDateTime,
    ) -> Result<CanonicalName, DeriveError> {
        let canonical_name = kept.join(" ");
        let canonical_slug = slugify(&canonical_name);
        if canonical_slug.is_empty() {
            return Err(DeriveError::NoIdentityTokens {
                fdc_id,
                description: canonical_name,
            });
        }

        Ok(CanonicalName {
            fdc_id,
            level,
            canonical_name,
            canonical_slug,
            removed_tokens: removed,
            kept_tokens: kept,
            description_hash: description_hash.to_string(),
            canonical_version: CANONICAL_VERSION,
            assessed_at,
        })
    }

    fn strips(&self, token: &str, level: NameLevel) -> bool {
        self.rules.iter().any(|rule| {
            let applies = match level {
                NameLevel::Base => rule.strip_at_base,
                NameLevel::Specific => rule.strip_at_specific,
            };
            applies && rule.words.contains(&token)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(description: &str) -> [CanonicalName; 2] {
        Deriver::default()
            .derive(1, description, OffsetDateTime::UNIX_EPOCH)
            .unwrap()
    }

    #[test]
    fn test_base_strips_specific_keeps_cut() {
        let [base, specific] = derive("Chicken breast, skinless, raw");
        assert_eq!(base.canonical_name, "chicken breast");
        assert_eq!(base.canonical_slug, "chicken-breast");
        assert_eq!(specific.canonical_name, "chicken breast skinless");
        assert_eq!(specific.canonical_slug, "chicken-breast-skinless");
    }

    #[test]
    fn test_scenario_same_base_for_variant_descriptions() {
        let [a_base, _] = derive("Chicken, breast, raw");
        let [b_base, _] = derive("Chicken breast, skinless, raw");
        assert_eq!(a_base.canonical_name, "chicken breast");
        assert_eq!(b_base.canonical_name, "chicken breast");
    }

    #[test]
    fn test_base_removals_superset_of_specific() {
        for description in [
            "Chicken breast, skinless, raw",
            "Tomatoes, canned, diced, low-sodium",
            "Salmon, smoked, sliced",
            "Milk, nonfat, fluid",
        ] {
            let [base, specific] = derive(description);
            for token in &specific.removed_tokens {
                assert!(
                    base.removed_tokens.contains(token),
                    "{description}: base removals missing {token}"
                );
            }
        }
    }

    #[test]
    fn test_deterministic_across_runs() {
        let first = derive("Garlic, raw");
        let second = derive("Garlic, raw");
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_modifier_description_falls_back() {
        // "dried" alone would strip to nothing at base level
        let [base, _] = derive("Dried");
        assert_eq!(base.canonical_name, "dried");
        assert!(base.removed_tokens.is_empty());
    }

    #[test]
    fn test_fallback_applies_to_both_levels() {
        // "raw" strips at both levels, "frozen" only at base: the base
        // fallback must pull the specific level along, or specific would
        // remove a token base kept.
        let [base, specific] = derive("Raw, frozen");
        assert_eq!(base.canonical_name, "raw frozen");
        assert_eq!(specific.canonical_name, "raw frozen");
        assert!(base.removed_tokens.is_empty());
        assert!(specific.removed_tokens.is_empty());
        for token in &specific.removed_tokens {
            assert!(base.removed_tokens.contains(token));
        }
    }

    #[test]
    fn test_empty_description_is_input_error() {
        let err = Deriver::default()
            .derive(7, "   ", OffsetDateTime::UNIX_EPOCH)
            .unwrap_err();
        assert!(matches!(err, DeriveError::EmptyDescription(7)));
    }

    #[test]
    fn test_description_hash_stable_and_distinct() {
        let a = Deriver::description_hash("Chicken, raw");
        let b = Deriver::description_hash("Chicken, raw");
        let c = Deriver::description_hash("Chicken, cooked");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_slug_matches_slugified_name() {
        let [base, specific] = derive("Beans, green, canned, drained");
        assert_eq!(base.canonical_slug, cookdex_lexicon::slugify(&base.canonical_name));
        assert_eq!(
            specific.canonical_slug,
            cookdex_lexicon::slugify(&specific.canonical_name)
        );
    }

    #[test]
    fn test_version_stamped() {
        let [base, specific] = derive("Onions, raw");
        assert_eq!(base.canonical_version, CANONICAL_VERSION);
        assert_eq!(specific.canonical_version, CANONICAL_VERSION);
    }
}
