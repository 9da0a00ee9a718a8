pub mod classify;
pub mod tokenize;
pub mod vocabulary;

// Re-export commonly used types
pub use classify::{Classification, Classifier};
pub use tokenize::{normalize_surface, slugify, tokenize};
pub use vocabulary::Vocabulary;
