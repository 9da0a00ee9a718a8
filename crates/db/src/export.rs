use serde::Serialize;
use sqlx::SqlitePool;

use crate::DbError;

/// One catalog row for the external download endpoint: a canonical base
/// ingredient with cookability and aggregated macro statistics over the
/// foods it covers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CatalogRow {
    pub canonical_slug: String,
    pub canonical_name: String,
    pub food_count: i64,
    pub cookable_count: i64,
    pub avg_energy_kcal: Option<f64>,
    pub avg_protein_g: Option<f64>,
    pub avg_fat_g: Option<f64>,
    pub avg_carbs_g: Option<f64>,
}

/// Full canonical/ingredient catalog, one row per base slug, ordered by
/// slug for stable exports.
pub async fn export_catalog(pool: &SqlitePool) -> Result<Vec<CatalogRow>, DbError> {
    let rows = sqlx::query_as::<_, CatalogRow>(
        r#"
        SELECT
            cn.canonical_slug                              AS canonical_slug,
            MIN(cn.canonical_name)                         AS canonical_name,
            COUNT(DISTINCT cn.fdc_id)                      AS food_count,
            COALESCE(SUM(CASE WHEN ca.is_cookable = 1 THEN 1 ELSE 0 END), 0)
                                                           AS cookable_count,
            AVG(n.energy_kcal)                             AS avg_energy_kcal,
            AVG(n.protein_g)                               AS avg_protein_g,
            AVG(n.fat_g)                                   AS avg_fat_g,
            AVG(n.carbs_g)                                 AS avg_carbs_g
        FROM canonical_names cn
        LEFT JOIN cookability_assessments ca ON ca.fdc_id = cn.fdc_id
        LEFT JOIN (
            SELECT fdc_id,
                   AVG(CASE WHEN nutrient_name = 'Energy' THEN amount END)
                       AS energy_kcal,
                   AVG(CASE WHEN nutrient_name = 'Protein' THEN amount END)
                       AS protein_g,
                   AVG(CASE WHEN nutrient_name = 'Total lipid (fat)' THEN amount END)
                       AS fat_g,
                   AVG(CASE WHEN nutrient_name = 'Carbohydrate, by difference' THEN amount END)
                       AS carbs_g
            FROM food_nutrients
            GROUP BY fdc_id
        ) n ON n.fdc_id = cn.fdc_id
        WHERE cn.level = 'base'
        GROUP BY cn.canonical_slug
        ORDER BY cn.canonical_slug
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
