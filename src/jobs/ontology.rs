use std::path::Path;

use cookdex_ontology::{load_ontology, save_ontology, CleanReport, Cleaner};

use crate::error::AppError;

/// Clean an ontology file: drop invalid surface forms, dedupe across
/// entries, re-insert display names, synthesize from slugs. Dry run unless
/// `write` is set.
pub fn clean_ontology(path: &Path, write: bool) -> Result<CleanReport, AppError> {
    let entries = load_ontology(path)?;
    let (cleaned, report) = Cleaner::default().clean(&entries);

    // No surface form may be owned by more than one entry after cleaning.
    let duplicates = Cleaner::verify(&cleaned);
    if !duplicates.is_empty() {
        for duplicate in &duplicates {
            tracing::error!(
                form = %duplicate.form,
                owners = ?duplicate.owners,
                "surface form owned by multiple entries after cleaning"
            );
        }
        return Err(AppError::Consistency(format!(
            "{} surface forms owned by multiple entries after cleaning",
            duplicates.len()
        )));
    }

    tracing::info!(
        entries_in = report.entries_in,
        forms_in = report.forms_in,
        forms_kept = report.forms_kept,
        removals = report.removals.len(),
        removed_by_reason = ?report.removed_by_reason,
        display_names_reinserted = report.display_names_reinserted,
        forms_synthesized = report.forms_synthesized,
        "ontology cleaned"
    );

    if write {
        save_ontology(path, &cleaned)?;
        tracing::info!(path = %path.display(), "cleaned ontology written");
    } else {
        tracing::info!("dry run, pass --write to persist changes");
    }

    Ok(report)
}
