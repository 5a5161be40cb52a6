//! Database operations for the singleton `system_status` crawl lease.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

const GLOBAL_ID: &str = "global";

/// The singleton `system_status` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SystemStatusRow {
    pub id: String,
    pub is_crawling: bool,
    /// When the current lease was taken; `NULL` when no run is in progress.
    pub crawl_started_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Fetches the singleton status row.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the row is missing (the `migrate`
/// command seeds it), or [`DbError::Sqlx`] if the query fails.
pub async fn get_system_status(pool: &PgPool) -> Result<SystemStatusRow, DbError> {
    let row = sqlx::query_as::<_, SystemStatusRow>(
        "SELECT id, is_crawling, crawl_started_at, updated_at \
         FROM system_status \
         WHERE id = $1",
    )
    .bind(GLOBAL_ID)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Attempts to take the crawl lease in a single conditional update.
///
/// Succeeds when no run is in progress, or when the holder's lease is older
/// than `ttl_secs` (a crashed run's lease is reclaimed instead of requiring
/// a manual reset). Returns `false` when another unexpired run holds it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn try_acquire_crawl_lease(pool: &PgPool, ttl_secs: i64) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE system_status \
         SET is_crawling = TRUE, crawl_started_at = NOW(), updated_at = NOW() \
         WHERE id = $1 \
           AND (is_crawling = FALSE \
                OR crawl_started_at IS NULL \
                OR crawl_started_at < NOW() - ($2::double precision * INTERVAL '1 second'))",
    )
    .bind(GLOBAL_ID)
    .bind(ttl_secs)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Releases the crawl lease unconditionally.
///
/// Used both by the pipeline's guaranteed-release path and by the manual
/// `reset-status` command.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn release_crawl_lease(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE system_status \
         SET is_crawling = FALSE, crawl_started_at = NULL, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(GLOBAL_ID)
    .execute(pool)
    .await?;

    Ok(())
}
