pub mod config;
pub mod error;
pub mod jobs;
pub mod observability;

pub use error::AppError;
