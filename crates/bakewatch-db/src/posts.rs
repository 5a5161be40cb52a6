//! Database operations for the `posts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub target_account_id: i64,
    pub post_url: String,
    pub post_content: String,
    /// `NULL` when the provider reported no (or a zero) timestamp.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inserts a post, or replaces the existing one sharing the same `post_url`.
///
/// Conflicts on `post_url` overwrite `target_account_id`, `post_content`,
/// and `published_at` in place (replace, not merge), so a repeated scrape of
/// the same post is idempotent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_post(
    pool: &PgPool,
    target_account_id: i64,
    post_url: &str,
    post_content: &str,
    published_at: Option<DateTime<Utc>>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO posts (target_account_id, post_url, post_content, published_at) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (post_url) DO UPDATE SET \
             target_account_id = EXCLUDED.target_account_id, \
             post_content      = EXCLUDED.post_content, \
             published_at      = EXCLUDED.published_at, \
             updated_at        = NOW()",
    )
    .bind(target_account_id)
    .bind(post_url)
    .bind(post_content)
    .bind(published_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the most recently published posts for an account, newest first.
///
/// Posts with a `NULL` publish time sort last, so unknown-date posts are
/// treated as the oldest.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_posts(
    pool: &PgPool,
    target_account_id: i64,
    limit: i64,
) -> Result<Vec<PostRow>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT id, target_account_id, post_url, post_content, published_at, \
                created_at, updated_at \
         FROM posts \
         WHERE target_account_id = $1 \
         ORDER BY published_at DESC NULLS LAST, id DESC \
         LIMIT $2",
    )
    .bind(target_account_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
