use std::collections::BTreeMap;

use futures::{stream, StreamExt};
use serde::Serialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use cookdex_canonical::{DeriveError, Deriver, CANONICAL_VERSION};
use cookdex_cookability::{Assessor, ASSESSMENT_VERSION};
use cookdex_db::{
    fetch_food_facts, fetch_foods, stored_assessment_version, stored_canonical_state,
    upsert_assessment, upsert_canonical, FoodRecord,
};

use crate::error::AppError;

/// Per-run tallies. Input problems and per-record failures are counted here
/// instead of aborting the run; each food's outcome is independent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub foods_in: u64,
    pub written: u64,
    pub skipped_unchanged: u64,
    pub skipped_input: u64,
    pub failed: u64,
    pub skipped_by_reason: BTreeMap<String, u64>,
}

enum Outcome {
    Written,
    SkippedUnchanged,
    SkippedInput(&'static str),
    Failed,
}

impl RunSummary {
    fn tally(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Written => self.written += 1,
            Outcome::SkippedUnchanged => self.skipped_unchanged += 1,
            Outcome::SkippedInput(reason) => {
                self.skipped_input += 1;
                *self.skipped_by_reason.entry(reason.to_string()).or_insert(0) += 1;
            }
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Derive and store canonical names for every food. Shards per food; each
/// task writes only its own rows. With `changed_only`, foods whose stored
/// (description_hash, canonical_version) still match are skipped.
pub async fn backfill_canonical(
    pool: &SqlitePool,
    concurrency: usize,
    changed_only: bool,
) -> Result<RunSummary, AppError> {
    let foods = fetch_foods(pool).await?;
    let deriver = Deriver::default();
    let assessed_at = OffsetDateTime::now_utc();

    let mut summary = RunSummary {
        foods_in: foods.len() as u64,
        ..RunSummary::default()
    };

    let mut outcomes = stream::iter(foods.into_iter().map(|food| {
        let deriver = deriver.clone();
        async move { canonical_one(pool, &deriver, &food, changed_only, assessed_at).await }
    }))
    .buffer_unordered(concurrency);

    while let Some(outcome) = outcomes.next().await {
        summary.tally(outcome);
    }

    tracing::info!(
        foods_in = summary.foods_in,
        written = summary.written,
        skipped_unchanged = summary.skipped_unchanged,
        skipped_input = summary.skipped_input,
        failed = summary.failed,
        "canonical backfill completed"
    );
    Ok(summary)
}

async fn canonical_one(
    pool: &SqlitePool,
    deriver: &Deriver,
    food: &FoodRecord,
    changed_only: bool,
    assessed_at: OffsetDateTime,
) -> Outcome {
    if changed_only {
        match stored_canonical_state(pool, food.fdc_id).await {
            Ok(Some((hash, version)))
                if hash == Deriver::description_hash(&food.description)
                    && version == CANONICAL_VERSION =>
            {
                return Outcome::SkippedUnchanged;
            }
            Ok(_) => {}
            Err(error) => {
                tracing::error!(fdc_id = food.fdc_id, %error, "failed to read stored canonical state");
                return Outcome::Failed;
            }
        }
    }

    let names = match deriver.derive(food.fdc_id, &food.description, assessed_at) {
        Ok(names) => names,
        Err(error @ DeriveError::EmptyDescription(_)) => {
            tracing::warn!(fdc_id = food.fdc_id, %error, "skipping food");
            return Outcome::SkippedInput("empty_description");
        }
        Err(error @ DeriveError::NoIdentityTokens { .. }) => {
            tracing::warn!(fdc_id = food.fdc_id, %error, "skipping food");
            return Outcome::SkippedInput("no_identity_tokens");
        }
    };

    for name in &names {
        if let Err(error) = upsert_canonical(pool, name).await {
            tracing::error!(fdc_id = food.fdc_id, %error, "failed to store canonical name");
            return Outcome::Failed;
        }
    }
    Outcome::Written
}

/// Assess and store cookability for every food. With `changed_only`, foods
/// already assessed at the current version are skipped.
pub async fn backfill_cookability(
    pool: &SqlitePool,
    assessor: &Assessor,
    concurrency: usize,
    changed_only: bool,
) -> Result<RunSummary, AppError> {
    let foods = fetch_foods(pool).await?;

    let mut summary = RunSummary {
        foods_in: foods.len() as u64,
        ..RunSummary::default()
    };

    let mut outcomes = stream::iter(
        foods
            .into_iter()
            .map(|food| async move { cookability_one(pool, assessor, &food, changed_only).await }),
    )
    .buffer_unordered(concurrency);

    while let Some(outcome) = outcomes.next().await {
        summary.tally(outcome);
    }

    tracing::info!(
        foods_in = summary.foods_in,
        written = summary.written,
        skipped_unchanged = summary.skipped_unchanged,
        failed = summary.failed,
        "cookability backfill completed"
    );
    Ok(summary)
}

async fn cookability_one(
    pool: &SqlitePool,
    assessor: &Assessor,
    food: &FoodRecord,
    changed_only: bool,
) -> Outcome {
    if changed_only {
        match stored_assessment_version(pool, food.fdc_id).await {
            Ok(Some(version)) if version == ASSESSMENT_VERSION => {
                return Outcome::SkippedUnchanged;
            }
            Ok(_) => {}
            Err(error) => {
                tracing::error!(fdc_id = food.fdc_id, %error, "failed to read stored assessment");
                return Outcome::Failed;
            }
        }
    }

    let facts = match fetch_food_facts(pool, food).await {
        Ok(facts) => facts,
        Err(error) => {
            tracing::error!(fdc_id = food.fdc_id, %error, "failed to load food facts");
            return Outcome::Failed;
        }
    };

    match upsert_assessment(pool, &assessor.assess(&facts)).await {
        Ok(()) => Outcome::Written,
        Err(error) => {
            tracing::error!(fdc_id = food.fdc_id, %error, "failed to store assessment");
            Outcome::Failed
        }
    }
}
