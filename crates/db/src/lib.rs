pub mod assessments;
pub mod canonical_names;
pub mod export;
pub mod foods;
pub mod schema;

pub use assessments::{stored_assessment_version, upsert_assessment};
pub use canonical_names::{fetch_base_names, stored_canonical_state, upsert_canonical};
pub use export::{export_catalog, CatalogRow};
pub use foods::{fetch_food_facts, fetch_foods, FoodRecord};
pub use schema::migrate;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid stored level '{0}'")]
    InvalidLevel(String),

    #[error("invalid stored timestamp: {0}")]
    InvalidTimestamp(#[from] time::error::Parse),

    #[error("timestamp formatting failed: {0}")]
    TimestampFormat(#[from] time::error::Format),
}

/// Open a SQLite pool for the given database URL.
pub async fn create_pool(url: &str, max_connections: u32) -> Result<SqlitePool, DbError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    Ok(pool)
}
