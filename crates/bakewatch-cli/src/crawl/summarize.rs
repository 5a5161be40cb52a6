//! The summarize stage: latest stored posts in, one structured summary out.

use chrono::Utc;
use sqlx::PgPool;

use bakewatch_core::{AppConfig, POSTS_PER_ACCOUNT};
use bakewatch_db::TargetAccountRow;
use bakewatch_summarizer::{build_summary_prompt, parse_summary, GeminiClient, SourcePost};

use super::{AccountOutcome, StageSummary};

/// Summarizes the latest stored posts of every active account.
///
/// Accounts with no stored posts only get their scraped timestamp
/// refreshed. Provider, parse, and persistence failures for one account are
/// logged and skipped so the rest of the run continues. When no summarizer
/// API key is configured the stage logs an error and does nothing.
///
/// # Errors
///
/// Returns an error if the account snapshot or an account's posts cannot be
/// fetched; everything past that point is swallowed per account.
pub(crate) async fn run_summarize(
    pool: &PgPool,
    config: &AppConfig,
) -> anyhow::Result<StageSummary> {
    let mut summary = StageSummary::default();

    let Some(api_key) = config.summary_api_key.as_deref() else {
        tracing::error!("GEMINI_API_KEY is not set; skipping summarize stage");
        return Ok(summary);
    };

    let client = GeminiClient::with_base_url(
        api_key,
        &config.summary_model,
        config.request_timeout_secs,
        &config.summary_base_url,
    )?;

    let accounts = bakewatch_db::list_active_accounts(pool).await?;
    if accounts.is_empty() {
        tracing::info!("no active target accounts found");
        return Ok(summary);
    }

    let limit = i64::try_from(POSTS_PER_ACCOUNT).unwrap_or(i64::MAX);

    for account in &accounts {
        let posts = bakewatch_db::list_recent_posts(pool, account.id, limit).await?;

        if posts.is_empty() {
            tracing::info!(
                handle = %account.handle,
                "no stored posts; refreshing timestamp only"
            );
            bakewatch_db::touch_last_scraped(pool, account.id).await?;
            summary.push(AccountOutcome::NoPosts {
                handle: account.handle.clone(),
            });
            continue;
        }

        let sources: Vec<SourcePost> = posts
            .iter()
            .map(|p| SourcePost {
                content: p.post_content.clone(),
                url: p.post_url.clone(),
                published_at: p.published_at,
            })
            .collect();
        let prompt = build_summary_prompt(&account.handle, Utc::now(), &sources);

        tracing::info!(handle = %account.handle, posts = posts.len(), "requesting summary");

        match summarize_account(pool, &client, account, &prompt).await {
            Ok(()) => {
                tracing::info!(handle = %account.handle, "summary stored");
                summary.push(AccountOutcome::Summarized {
                    handle: account.handle.clone(),
                });
            }
            Err(e) => {
                tracing::error!(
                    handle = %account.handle,
                    error = format!("{e:#}"),
                    "failed to generate summary; skipping account"
                );
                summary.push(AccountOutcome::Failed {
                    handle: account.handle.clone(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    Ok(summary)
}

/// One provider call, parse, and upsert for a single account.
async fn summarize_account(
    pool: &PgPool,
    client: &GeminiClient,
    account: &TargetAccountRow,
    prompt: &str,
) -> anyhow::Result<()> {
    let raw = client.generate(prompt).await?;

    let payload = match parse_summary(&raw) {
        Ok(payload) => payload,
        Err(e) => {
            // Keep the raw answer in the log so a drifting model output
            // format can be diagnosed from the run alone.
            tracing::error!(
                handle = %account.handle,
                raw = %raw,
                "model returned an unparseable summary"
            );
            return Err(e.into());
        }
    };

    let value = serde_json::to_value(&payload)?;
    bakewatch_db::upsert_summary(pool, account.id, &value, "success").await?;
    bakewatch_db::touch_last_scraped(pool, account.id).await?;

    Ok(())
}
