//! Database operations for the `ai_summaries` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `ai_summaries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SummaryRow {
    pub id: i64,
    pub target_account_id: i64,
    /// Structured summary payload as produced by the summarize stage.
    pub summary: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inserts or replaces the live summary for an account.
///
/// Keyed on the unique `target_account_id` constraint, so there is no
/// separate existence lookup and at most one live summary per account.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_summary(
    pool: &PgPool,
    target_account_id: i64,
    summary: &serde_json::Value,
    status: &str,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO ai_summaries (target_account_id, summary, status) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (target_account_id) DO UPDATE SET \
             summary    = EXCLUDED.summary, \
             status     = EXCLUDED.status, \
             updated_at = NOW()",
    )
    .bind(target_account_id)
    .bind(summary)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the live summary for an account, or `None` if none exists yet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_summary_for_account(
    pool: &PgPool,
    target_account_id: i64,
) -> Result<Option<SummaryRow>, DbError> {
    let row = sqlx::query_as::<_, SummaryRow>(
        "SELECT id, target_account_id, summary, status, created_at, updated_at \
         FROM ai_summaries \
         WHERE target_account_id = $1",
    )
    .bind(target_account_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
