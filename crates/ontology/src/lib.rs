pub mod cleaner;
pub mod entry;

pub use cleaner::{CleanReport, Cleaner, DuplicateForm, Removal, RemovalReason};
pub use entry::{load_ontology, save_ontology, OntologyEntry, OntologyError};
