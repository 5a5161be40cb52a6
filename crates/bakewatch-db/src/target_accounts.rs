//! Database operations for the `target_accounts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `target_accounts` table.
///
/// `status` is either `active` (eligible for a crawl pass) or `syncing`
/// (a scrape call is in flight).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TargetAccountRow {
    pub id: i64,
    pub public_id: Uuid,
    pub handle: String,
    pub status: String,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creates a new target account in `active` status and returns the full row.
///
/// Generates a UUID in Rust and binds it to `public_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a unique
/// violation on `handle`).
pub async fn create_target_account(
    pool: &PgPool,
    handle: &str,
) -> Result<TargetAccountRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, TargetAccountRow>(
        "INSERT INTO target_accounts (public_id, handle, status) \
         VALUES ($1, $2, 'active') \
         RETURNING id, public_id, handle, status, last_scraped_at, created_at, updated_at",
    )
    .bind(public_id)
    .bind(handle)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns all accounts with status `active`, ordered by handle.
///
/// This is the eligibility snapshot used by both crawl stages; accounts
/// added after the snapshot are picked up on the next run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_accounts(pool: &PgPool) -> Result<Vec<TargetAccountRow>, DbError> {
    let rows = sqlx::query_as::<_, TargetAccountRow>(
        "SELECT id, public_id, handle, status, last_scraped_at, created_at, updated_at \
         FROM target_accounts \
         WHERE status = 'active' \
         ORDER BY handle",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns all accounts regardless of status, ordered by handle.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_accounts(pool: &PgPool) -> Result<Vec<TargetAccountRow>, DbError> {
    let rows = sqlx::query_as::<_, TargetAccountRow>(
        "SELECT id, public_id, handle, status, last_scraped_at, created_at, updated_at \
         FROM target_accounts \
         ORDER BY handle",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks an account as `syncing` while a scrape call is in flight.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_account_syncing(pool: &PgPool, id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE target_accounts \
         SET status = 'syncing', updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Reverts an account to `active`.
///
/// Called on every exit path of the scrape loop so an account is never left
/// stuck in `syncing`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_account_active(pool: &PgPool, id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE target_accounts \
         SET status = 'active', updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Sets `last_scraped_at = NOW()` for an account.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn touch_last_scraped(pool: &PgPool, id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE target_accounts \
         SET last_scraped_at = NOW(), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
