use sqlx::SqlitePool;

use cookdex_cookability::{FoodFacts, NutrientProfile};

use crate::DbError;

/// One row of the read-only `foods` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub fdc_id: i64,
    pub description: String,
    pub category: Option<String>,
    pub data_type: Option<String>,
}

/// All foods, ordered by fdc_id for deterministic backfill sharding.
pub async fn fetch_foods(pool: &SqlitePool) -> Result<Vec<FoodRecord>, DbError> {
    let rows = sqlx::query_as::<_, FoodRecord>(
        "SELECT fdc_id, description, category, data_type FROM foods ORDER BY fdc_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Assemble the assessor's view of one food: record fields plus portion
/// units and the macro nutrient profile per 100 g.
pub async fn fetch_food_facts(
    pool: &SqlitePool,
    record: &FoodRecord,
) -> Result<FoodFacts, DbError> {
    let portion_units: Vec<String> = sqlx::query_scalar(
        "SELECT portion_unit FROM food_portions WHERE fdc_id = ? ORDER BY portion_unit",
    )
    .bind(record.fdc_id)
    .fetch_all(pool)
    .await?;

    let nutrient_rows: Vec<(String, f64)> = sqlx::query_as(
        "SELECT nutrient_name, amount FROM food_nutrients WHERE fdc_id = ?",
    )
    .bind(record.fdc_id)
    .fetch_all(pool)
    .await?;

    let mut nutrients = NutrientProfile::default();
    for (name, amount) in nutrient_rows {
        match name.as_str() {
            "Energy" => nutrients.energy_kcal = Some(amount),
            "Protein" => nutrients.protein_g = Some(amount),
            "Total lipid (fat)" => nutrients.fat_g = Some(amount),
            "Carbohydrate, by difference" => nutrients.carbs_g = Some(amount),
            _ => {}
        }
    }

    Ok(FoodFacts {
        fdc_id: record.fdc_id,
        description: record.description.clone(),
        category: record.category.clone(),
        portion_units,
        nutrients,
    })
}
