use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use cookdex_lexicon::{normalize_surface, slugify, Vocabulary};

use crate::entry::OntologyEntry;

/// Why a surface form was removed from its entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    TooShort,
    DuplicateNotPrimary,
    GenericSingleWord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub slug: String,
    pub form: String,
    pub reason: RemovalReason,
}

/// A surface form claimed by more than one entry after cleaning. Any
/// survivor indicates a rule-ordering defect, never expected output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateForm {
    pub form: String,
    pub owners: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub entries_in: usize,
    pub forms_in: usize,
    pub forms_kept: usize,
    pub removals: Vec<Removal>,
    pub removed_by_reason: BTreeMap<String, u64>,
    pub display_names_reinserted: u64,
    pub forms_synthesized: u64,
}

impl CleanReport {
    fn record_removal(&mut self, slug: &str, form: String, reason: RemovalReason) {
        *self.removed_by_reason.entry(reason.to_string()).or_insert(0) += 1;
        self.removals.push(Removal {
            slug: slug.to_string(),
            form,
            reason,
        });
    }
}

/// Ontology synonym cleaner.
///
/// Duplicate detection is inherently whole-corpus: the inverted
/// form -> owners index is built over every entry before any one form is
/// judged, so the outcome is independent of entry order.
pub struct Cleaner {
    vocab: Vocabulary,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

impl Cleaner {
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    /// Clean all entries: drop invalid surface forms, dedupe, re-insert
    /// display names, synthesize a form from the slug when nothing survives.
    /// Idempotent on already-cleaned input.
    pub fn clean(&self, entries: &[OntologyEntry]) -> (Vec<OntologyEntry>, CleanReport) {
        let index = Self::build_index(entries);
        let claims = Self::build_claim_index(entries);

        let mut report = CleanReport {
            entries_in: entries.len(),
            ..CleanReport::default()
        };

        let mut cleaned = Vec::with_capacity(entries.len());
        for entry in entries {
            report.forms_in += entry.surface_forms.len();

            let mut seen = HashSet::new();
            let mut valid_forms = Vec::new();
            for raw in &entry.surface_forms {
                let form = normalize_surface(raw);
                if !seen.insert(form.clone()) {
                    continue;
                }
                match self.judge(&form, &entry.slug, &index) {
                    Ok(()) => valid_forms.push(form),
                    Err(reason) => report.record_removal(&entry.slug, form, reason),
                }
            }

            // Re-insert the display name when it names only this entry,
            // counting both listed surface forms and the forms other
            // entries stand to add back in this same pass.
            let display_form = normalize_surface(&entry.display_name);
            let display_unclaimed_elsewhere = index
                .get(&display_form)
                .map(|owners| owners.iter().all(|o| o == &entry.slug))
                .unwrap_or(true);
            if !valid_forms.contains(&display_form)
                && display_unclaimed_elsewhere
                && Self::may_claim(&claims, &display_form, &entry.slug)
                && self.judge(&display_form, &entry.slug, &index).is_ok()
            {
                valid_forms.push(display_form);
                report.display_names_reinserted += 1;
            }

            // Last resort: expand the slug itself into a surface form.
            if valid_forms.is_empty() {
                let expanded = entry.slug.replace('-', " ");
                if Self::may_claim(&claims, &expanded, &entry.slug)
                    && self.judge(&expanded, &entry.slug, &index).is_ok()
                {
                    valid_forms.push(expanded);
                    report.forms_synthesized += 1;
                }
            }

            report.forms_kept += valid_forms.len();
            cleaned.push(OntologyEntry {
                surface_forms: valid_forms,
                ..entry.clone()
            });
        }

        tracing::info!(
            entries = report.entries_in,
            forms_in = report.forms_in,
            forms_kept = report.forms_kept,
            removed = report.removals.len(),
            "ontology clean complete"
        );

        (cleaned, report)
    }

    /// Rebuild the inverted index over cleaned output and report any form
    /// still claimed by more than one entry.
    pub fn verify(entries: &[OntologyEntry]) -> Vec<DuplicateForm> {
        let index = Self::build_index(entries);
        let mut duplicates: Vec<DuplicateForm> = index
            .into_iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(form, owners)| {
                let mut owners: Vec<String> = owners.into_iter().collect();
                owners.sort();
                DuplicateForm { form, owners }
            })
            .collect();
        duplicates.sort_by(|a, b| a.form.cmp(&b.form));
        duplicates
    }

    fn build_index(entries: &[OntologyEntry]) -> HashMap<String, HashSet<String>> {
        let mut index: HashMap<String, HashSet<String>> = HashMap::new();
        for entry in entries {
            for form in &entry.surface_forms {
                index
                    .entry(normalize_surface(form))
                    .or_default()
                    .insert(entry.slug.clone());
            }
        }
        index
    }

    /// Forms each entry may add back during cleaning (its normalized
    /// display name and its hyphen-expanded slug), indexed over all entries
    /// ahead of the pass so no two entries add the same form.
    fn build_claim_index(entries: &[OntologyEntry]) -> HashMap<String, HashSet<String>> {
        let mut claims: HashMap<String, HashSet<String>> = HashMap::new();
        for entry in entries {
            claims
                .entry(normalize_surface(&entry.display_name))
                .or_default()
                .insert(entry.slug.clone());
            claims
                .entry(entry.slug.replace('-', " "))
                .or_default()
                .insert(entry.slug.clone());
        }
        claims
    }

    /// True when `slug` may add `form` back: it is the primary owner (the
    /// form slugifies to it), or no other entry stands to add the form.
    fn may_claim(claims: &HashMap<String, HashSet<String>>, form: &str, slug: &str) -> bool {
        slugify(form) == slug
            || claims
                .get(form)
                .map(|owners| owners.iter().all(|o| o == slug))
                .unwrap_or(true)
    }

    /// Validity rule for a normalized form owned by `slug`.
    fn judge(
        &self,
        form: &str,
        slug: &str,
        index: &HashMap<String, HashSet<String>>,
    ) -> Result<(), RemovalReason> {
        if form.len() < 2 {
            return Err(RemovalReason::TooShort);
        }

        let single_word = !form.contains(' ');
        let claimed_by_others = index
            .get(form)
            .map(|owners| owners.iter().any(|o| o != slug))
            .unwrap_or(false);

        if claimed_by_others {
            let primary = slugify(form) == slug || (single_word && form == slug);
            if !primary {
                return Err(RemovalReason::DuplicateNotPrimary);
            }
            return Ok(());
        }

        if single_word {
            if self.vocab.allowed_single_words.contains(form) {
                return Ok(());
            }
            if self.vocab.generic_single_words.contains(form) {
                let variant = Vocabulary::plural_variant(form);
                if slug == form || slug == variant {
                    return Ok(());
                }
                return Err(RemovalReason::GenericSingleWord);
            }
            // Unique, non-generic single word: valid by default.
            return Ok(());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(slug: &str, display: &str, forms: &[&str]) -> OntologyEntry {
        OntologyEntry {
            slug: slug.to_string(),
            display_name: display.to_string(),
            surface_forms: forms.iter().map(|f| f.to_string()).collect(),
            fdc_id: None,
            confirm_tokens: None,
            recipe_count: None,
        }
    }

    #[test]
    fn test_scenario_generic_single_word_removed() {
        let entries = vec![entry("green-beans", "Green Beans", &["beans", "green beans"])];
        let (cleaned, report) = Cleaner::default().clean(&entries);

        assert_eq!(cleaned[0].surface_forms, vec!["green beans"]);
        assert_eq!(report.removals.len(), 1);
        assert_eq!(report.removals[0].form, "beans");
        assert_eq!(report.removals[0].reason, RemovalReason::GenericSingleWord);
    }

    #[test]
    fn test_generic_word_kept_when_slug_matches() {
        // "beans" is generic, but the entry slugged "beans" may keep it,
        // and so may "bean" via the naive plural variant.
        let entries = vec![entry("bean", "Beans", &["beans"])];
        let (cleaned, _) = Cleaner::default().clean(&entries);
        assert_eq!(cleaned[0].surface_forms, vec!["beans"]);
    }

    #[test]
    fn test_too_short_removed() {
        let entries = vec![entry("garlic", "Garlic", &["g", "garlic"])];
        let (cleaned, report) = Cleaner::default().clean(&entries);
        assert_eq!(cleaned[0].surface_forms, vec!["garlic"]);
        assert_eq!(report.removals[0].reason, RemovalReason::TooShort);
    }

    #[test]
    fn test_duplicate_goes_to_primary_owner() {
        let entries = vec![
            entry("red-pepper", "Red Pepper", &["red pepper", "pepper rings"]),
            entry("pepper-rings", "Pepper Rings", &["pepper rings"]),
        ];
        let (cleaned, report) = Cleaner::default().clean(&entries);

        // "pepper rings" slugifies to "pepper-rings": that entry keeps it,
        // the other loses it.
        assert_eq!(cleaned[0].surface_forms, vec!["red pepper"]);
        assert_eq!(cleaned[1].surface_forms, vec!["pepper rings"]);
        assert_eq!(report.removals.len(), 1);
        assert_eq!(report.removals[0].slug, "red-pepper");
        assert_eq!(report.removals[0].reason, RemovalReason::DuplicateNotPrimary);
    }

    #[test]
    fn test_dedupe_normalized_forms() {
        let entries = vec![entry("garlic", "Garlic", &["Garlic", "garlic", "GARLIC "])];
        let (cleaned, _) = Cleaner::default().clean(&entries);
        assert_eq!(cleaned[0].surface_forms, vec!["garlic"]);
    }

    #[test]
    fn test_display_name_reinserted() {
        let entries = vec![entry("chicken-breast", "Chicken Breast", &["chicken breasts"])];
        let (cleaned, report) = Cleaner::default().clean(&entries);
        assert!(cleaned[0]
            .surface_forms
            .contains(&"chicken breast".to_string()));
        assert_eq!(report.display_names_reinserted, 1);
    }

    #[test]
    fn test_colliding_display_names_leave_single_owner() {
        // Neither entry lists the form, but both display names normalize to
        // it. Only the entry the form slugifies to may add it back.
        let entries = vec![
            entry("fresh-garlic", "Fresh Garlic", &["peeled garlic cloves"]),
            entry("garlic-fresh", "fresh garlic", &["garlic fresh"]),
        ];
        let (cleaned, _) = Cleaner::default().clean(&entries);

        assert!(Cleaner::verify(&cleaned).is_empty());
        assert!(cleaned[0].surface_forms.contains(&"fresh garlic".to_string()));
        assert!(!cleaned[1].surface_forms.contains(&"fresh garlic".to_string()));

        let (twice, _) = Cleaner::default().clean(&cleaned);
        assert_eq!(cleaned, twice);
    }

    #[test]
    fn test_form_synthesized_from_slug_when_none_survive() {
        let entries = vec![entry("green-beans", "Beans", &["beans"])];
        let (cleaned, report) = Cleaner::default().clean(&entries);
        assert_eq!(cleaned[0].surface_forms, vec!["green beans"]);
        assert_eq!(report.forms_synthesized, 1);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let entries = vec![
            entry("green-beans", "Green Beans", &["beans", "green beans"]),
            entry("garlic", "Garlic", &["garlic", "g", "fresh garlic"]),
            entry("red-pepper", "Red Pepper", &["red pepper", "pepper rings"]),
            entry("pepper-rings", "Pepper Rings", &["pepper rings"]),
        ];
        let cleaner = Cleaner::default();
        let (once, _) = cleaner.clean(&entries);
        let (twice, report) = cleaner.clean(&once);

        assert_eq!(once, twice);
        assert!(report.removals.is_empty());
        assert_eq!(report.forms_synthesized, 0);
    }

    #[test]
    fn test_verify_reports_surviving_duplicates() {
        let dirty = vec![
            entry("garlic", "Garlic", &["fresh garlic"]),
            entry("garlic-fresh", "Fresh Garlic", &["fresh garlic"]),
        ];
        let duplicates = Cleaner::verify(&dirty);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].form, "fresh garlic");
        assert_eq!(duplicates[0].owners, vec!["garlic", "garlic-fresh"]);
    }

    #[test]
    fn test_verify_clean_output_has_no_duplicates() {
        let entries = vec![
            entry("red-pepper", "Red Pepper", &["red pepper", "pepper rings"]),
            entry("pepper-rings", "Pepper Rings", &["pepper rings"]),
            entry("green-beans", "Green Beans", &["beans", "green beans"]),
        ];
        let (cleaned, _) = Cleaner::default().clean(&entries);
        assert!(Cleaner::verify(&cleaned).is_empty());
    }
}
