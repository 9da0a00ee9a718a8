use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use cookdex_clusters::{BuildOutput, ClusterBuilder, FrequencyTable};
use cookdex_lexicon::Classifier;

use crate::config::ClusterConfig;
use crate::error::AppError;

/// Build synonym clusters from a JSONL recipe corpus and write the ranked
/// artifact as JSON.
pub fn build_clusters(
    corpus_path: &Path,
    out_path: &Path,
    config: &ClusterConfig,
) -> Result<BuildOutput, AppError> {
    let table = FrequencyTable::from_jsonl_path(corpus_path)?;
    let corpus_stats = table.stats().clone();
    tracing::info!(
        lines_read = corpus_stats.lines_read,
        malformed_lines = corpus_stats.malformed_lines,
        phrases_seen = corpus_stats.phrases_seen,
        distinct_phrases = table.len(),
        "corpus ingested"
    );

    let builder = ClusterBuilder::new(Classifier::default(), config.min_frequency)
        .with_floors(config.single_member_floor, config.compound_floor);
    let output = builder.build(table.into_entries());

    tracing::info!(
        entries_in = output.stats.entries_in,
        low_frequency_filtered = output.stats.low_frequency_filtered,
        instruction_filtered = output.stats.instruction_filtered,
        clusters_emitted = output.stats.clusters_emitted,
        compound_clusters = output.stats.compound_clusters,
        "cluster build completed"
    );

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(out_path)?);
    serde_json::to_writer_pretty(writer, &output)?;
    tracing::info!(path = %out_path.display(), "cluster artifact written");

    Ok(output)
}
