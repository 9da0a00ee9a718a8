use sqlx::SqlitePool;

use cookdex_cookability::Assessment;

use crate::DbError;

/// Insert or overwrite one cookability assessment. The table-level CHECK
/// re-validates the score/flag/threshold invariant on every write.
pub async fn upsert_assessment(pool: &SqlitePool, assessment: &Assessment) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO cookability_assessments
            (fdc_id, veto_flags, cookability_threshold, veto_score,
             is_cookable, assessment_version)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (fdc_id) DO UPDATE SET
            veto_flags = excluded.veto_flags,
            cookability_threshold = excluded.cookability_threshold,
            veto_score = excluded.veto_score,
            is_cookable = excluded.is_cookable,
            assessment_version = excluded.assessment_version
        "#,
    )
    .bind(assessment.fdc_id())
    .bind(serde_json::to_string(assessment.veto_flags())?)
    .bind(assessment.cookability_threshold())
    .bind(assessment.veto_score())
    .bind(assessment.is_cookable())
    .bind(assessment.assessment_version())
    .execute(pool)
    .await?;
    Ok(())
}

/// Stored assessment version for a food, used to skip unchanged re-runs.
pub async fn stored_assessment_version(
    pool: &SqlitePool,
    fdc_id: i64,
) -> Result<Option<u32>, DbError> {
    let version: Option<i64> = sqlx::query_scalar(
        "SELECT assessment_version FROM cookability_assessments WHERE fdc_id = ?",
    )
    .bind(fdc_id)
    .fetch_optional(pool)
    .await?;
    Ok(version.map(|v| v as u32))
}
