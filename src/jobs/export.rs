use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use sqlx::SqlitePool;

use cookdex_db::export_catalog;

use crate::error::AppError;

/// Write the ingredient catalog (canonical base names joined with
/// cookability and aggregated nutrient statistics) as a JSON file.
pub async fn write_catalog(pool: &SqlitePool, out_path: &Path) -> Result<usize, AppError> {
    let rows = export_catalog(pool).await?;

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(out_path)?);
    serde_json::to_writer_pretty(writer, &rows)?;

    tracing::info!(rows = rows.len(), path = %out_path.display(), "catalog exported");
    Ok(rows.len())
}
