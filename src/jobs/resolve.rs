use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use sqlx::SqlitePool;

use cookdex_clusters::BuildOutput;
use cookdex_db::fetch_base_names;
use cookdex_lexicon::Classifier;
use cookdex_ontology::load_ontology;
use cookdex_resolver::ResolverIndex;

use crate::config::ArtifactConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveSummary {
    pub inputs: u64,
    pub resolved: u64,
    pub unresolved: u64,
}

/// Build the runtime resolver index from the three sources, in priority
/// order: cleaned ontology, synonym clusters, canonical base names. A
/// missing artifact file degrades the index rather than failing the build.
pub async fn build_index(
    pool: &SqlitePool,
    artifacts: &ArtifactConfig,
    classifier: &Classifier,
) -> Result<ResolverIndex, AppError> {
    let mut index = ResolverIndex::default();

    let ontology_path = Path::new(&artifacts.ontology_path);
    if ontology_path.exists() {
        let entries = load_ontology(ontology_path)?;
        tracing::info!(entries = entries.len(), "ontology loaded into index");
        index.add_ontology(&entries);
    } else {
        tracing::warn!(path = %ontology_path.display(), "no ontology file, surface-form coverage reduced");
    }

    let clusters_path = Path::new(&artifacts.clusters_path);
    if clusters_path.exists() {
        let output: BuildOutput = serde_json::from_reader(BufReader::new(File::open(clusters_path)?))?;
        tracing::info!(clusters = output.clusters.len(), "synonym clusters loaded into index");
        index.add_clusters(&output.clusters, classifier);
    } else {
        tracing::warn!(path = %clusters_path.display(), "no cluster artifact, cluster-key coverage reduced");
    }

    let base_names = fetch_base_names(pool).await?;
    tracing::info!(base_names = base_names.len(), "canonical base names loaded into index");
    index.add_canonical_names(&base_names, classifier);

    Ok(index)
}

/// Resolve one ingredient string per input line, writing one JSON result
/// per line. Unresolved items are ordinary output, never failures.
pub fn resolve_lines<R: BufRead, W: Write>(
    index: &ResolverIndex,
    classifier: &Classifier,
    reader: R,
    mut out: W,
) -> Result<ResolveSummary, AppError> {
    let mut summary = ResolveSummary::default();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.inputs += 1;
        let result = index.resolve(classifier, &line);
        if result.is_resolved() {
            summary.resolved += 1;
        } else {
            summary.unresolved += 1;
        }
        serde_json::to_writer(&mut out, &result)?;
        writeln!(out)?;
    }

    tracing::info!(
        inputs = summary.inputs,
        resolved = summary.resolved,
        unresolved = summary.unresolved,
        "resolution completed"
    );
    Ok(summary)
}
