use thiserror::Error;

/// Top-level errors surfaced by the batch jobs.
///
/// Per-record input problems (empty descriptions, malformed corpus lines)
/// are not errors at this level: jobs skip them, tally them by reason and
/// complete. Consistency violations are raised as defects and abort the run.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] cookdex_db::DbError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] cookdex_clusters::CorpusError),

    #[error("Ontology error: {0}")]
    Ontology(#[from] cookdex_ontology::OntologyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Consistency defect: {0}")]
    Consistency(String),
}
