use sqlx::SqlitePool;

use crate::DbError;

/// Ordered, idempotent DDL. `foods`, `food_nutrients` and `food_portions`
/// are consumed read-only; `canonical_names` and `cookability_assessments`
/// are owned here. The cookability CHECK mirrors the scorer's invariant at
/// the storage layer.
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS foods (
        fdc_id INTEGER PRIMARY KEY,
        description TEXT NOT NULL,
        category TEXT,
        data_type TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS food_nutrients (
        fdc_id INTEGER NOT NULL,
        nutrient_name TEXT NOT NULL,
        unit TEXT NOT NULL,
        amount REAL NOT NULL,
        FOREIGN KEY (fdc_id) REFERENCES foods (fdc_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS food_portions (
        fdc_id INTEGER NOT NULL,
        portion_unit TEXT NOT NULL,
        gram_weight REAL,
        FOREIGN KEY (fdc_id) REFERENCES foods (fdc_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS canonical_names (
        fdc_id INTEGER NOT NULL,
        level TEXT NOT NULL CHECK (level IN ('base', 'specific')),
        canonical_name TEXT NOT NULL,
        canonical_slug TEXT NOT NULL,
        removed_tokens TEXT NOT NULL,
        kept_tokens TEXT NOT NULL,
        description_hash TEXT NOT NULL,
        canonical_version INTEGER NOT NULL,
        assessed_at TEXT NOT NULL,
        PRIMARY KEY (fdc_id, level)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_canonical_names_slug
        ON canonical_names (canonical_slug)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cookability_assessments (
        fdc_id INTEGER PRIMARY KEY,
        veto_flags TEXT NOT NULL,
        cookability_threshold INTEGER NOT NULL,
        veto_score INTEGER NOT NULL,
        is_cookable INTEGER NOT NULL,
        assessment_version INTEGER NOT NULL,
        CHECK (is_cookable = (veto_score < cookability_threshold))
    )
    "#,
];

/// Apply the schema. Safe to run repeatedly.
pub async fn migrate(pool: &SqlitePool) -> Result<(), DbError> {
    for statement in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(statements = MIGRATIONS.len(), "schema migrations applied");
    Ok(())
}
