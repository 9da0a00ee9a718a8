use sqlx::{Row, SqlitePool};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use cookdex_canonical::{CanonicalName, NameLevel};

use crate::DbError;

/// Insert or overwrite one canonical name row. Rows are written by backfill
/// jobs only; request-time code never mutates them.
pub async fn upsert_canonical(pool: &SqlitePool, name: &CanonicalName) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO canonical_names
            (fdc_id, level, canonical_name, canonical_slug, removed_tokens,
             kept_tokens, description_hash, canonical_version, assessed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (fdc_id, level) DO UPDATE SET
            canonical_name = excluded.canonical_name,
            canonical_slug = excluded.canonical_slug,
            removed_tokens = excluded.removed_tokens,
            kept_tokens = excluded.kept_tokens,
            description_hash = excluded.description_hash,
            canonical_version = excluded.canonical_version,
            assessed_at = excluded.assessed_at
        "#,
    )
    .bind(name.fdc_id)
    .bind(name.level.to_string())
    .bind(&name.canonical_name)
    .bind(&name.canonical_slug)
    .bind(serde_json::to_string(&name.removed_tokens)?)
    .bind(serde_json::to_string(&name.kept_tokens)?)
    .bind(&name.description_hash)
    .bind(name.canonical_version)
    .bind(name.assessed_at.format(&Rfc3339)?)
    .execute(pool)
    .await?;
    Ok(())
}

/// Stored (description_hash, canonical_version) for a food, read from the
/// base row. Backfill skips a food when both match the fresh derivation.
pub async fn stored_canonical_state(
    pool: &SqlitePool,
    fdc_id: i64,
) -> Result<Option<(String, u32)>, DbError> {
    let row = sqlx::query(
        "SELECT description_hash, canonical_version FROM canonical_names
         WHERE fdc_id = ? AND level = 'base'",
    )
    .bind(fdc_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some((
            row.try_get("description_hash")?,
            row.try_get::<i64, _>("canonical_version")? as u32,
        ))),
        None => Ok(None),
    }
}

/// All base-level canonical names, for resolver index construction.
pub async fn fetch_base_names(pool: &SqlitePool) -> Result<Vec<CanonicalName>, DbError> {
    let rows = sqlx::query(
        r#"
        SELECT fdc_id, level, canonical_name, canonical_slug, removed_tokens,
               kept_tokens, description_hash, canonical_version, assessed_at
        FROM canonical_names
        WHERE level = 'base'
        ORDER BY fdc_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let level_raw: String = row.try_get("level")?;
            let level: NameLevel = level_raw
                .parse()
                .map_err(|_| DbError::InvalidLevel(level_raw))?;
            let assessed_at_raw: String = row.try_get("assessed_at")?;
            Ok(CanonicalName {
                fdc_id: row.try_get("fdc_id")?,
                level,
                canonical_name: row.try_get("canonical_name")?,
                canonical_slug: row.try_get("canonical_slug")?,
                removed_tokens: serde_json::from_str(row.try_get::<&str, _>("removed_tokens")?)?,
                kept_tokens: serde_json::from_str(row.try_get::<&str, _>("kept_tokens")?)?,
                description_hash: row.try_get("description_hash")?,
                canonical_version: row.try_get::<i64, _>("canonical_version")? as u32,
                assessed_at: OffsetDateTime::parse(&assessed_at_raw, &Rfc3339)?,
            })
        })
        .collect()
}
