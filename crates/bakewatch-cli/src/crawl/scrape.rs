//! The budget-gated scrape stage.

use sqlx::PgPool;

use bakewatch_core::{AppConfig, MonthlyBudget, POSTS_PER_ACCOUNT};
use bakewatch_db::TargetAccountRow;
use bakewatch_scraper::InstagramScrapeClient;

use super::{AccountOutcome, StageSummary};

/// What the budget gate and provider call decided for one account.
enum ScrapeStep {
    Done(AccountOutcome),
    /// The monthly cap was hit; the caller stops processing the snapshot.
    BudgetExhausted,
}

/// Scrapes recent posts for every account in the active snapshot.
///
/// Each account is flipped to `syncing` for the duration of its provider
/// call and reverted to `active` on every exit path. Provider failures are
/// logged and skipped; budget exhaustion abandons the rest of the snapshot.
/// When no scrape API key is configured the stage logs an error and does
/// nothing, so the rest of the pipeline still runs.
///
/// # Errors
///
/// Returns an error on database or budget-file failures. Provider failures
/// never propagate.
pub(crate) async fn run_scrape(
    pool: &PgPool,
    config: &AppConfig,
) -> anyhow::Result<StageSummary> {
    let mut summary = StageSummary::default();

    let Some(api_key) = config.scrape_api_key.as_deref() else {
        tracing::error!("RAPIDAPI_KEY is not set; skipping scrape stage");
        return Ok(summary);
    };

    let client = InstagramScrapeClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.scrape_base_url,
    )?;
    let budget = MonthlyBudget::new(
        config.budget_path.clone(),
        config.monthly_call_cap,
        config.budget_retain_months,
    );

    let accounts = bakewatch_db::list_active_accounts(pool).await?;
    if accounts.is_empty() {
        tracing::info!("no active target accounts found");
        return Ok(summary);
    }

    for account in &accounts {
        tracing::info!(handle = %account.handle, id = account.id, "processing account");
        bakewatch_db::mark_account_syncing(pool, account.id).await?;

        let step = scrape_account(pool, &client, &budget, account).await;

        // Whatever happened above, the account never stays in `syncing`.
        bakewatch_db::mark_account_active(pool, account.id).await?;

        match step? {
            ScrapeStep::Done(outcome) => summary.push(outcome),
            ScrapeStep::BudgetExhausted => {
                summary.push(AccountOutcome::SkippedBudget {
                    handle: account.handle.clone(),
                });
                break;
            }
        }
    }

    Ok(summary)
}

async fn scrape_account(
    pool: &PgPool,
    client: &InstagramScrapeClient,
    budget: &MonthlyBudget,
    account: &TargetAccountRow,
) -> anyhow::Result<ScrapeStep> {
    let decision = budget.check_and_increment()?;
    if !decision.allowed {
        tracing::warn!(
            used = decision.count,
            cap = budget.cap(),
            "monthly scrape budget exhausted; stopping this run"
        );
        return Ok(ScrapeStep::BudgetExhausted);
    }

    tracing::info!(
        used = decision.count,
        cap = budget.cap(),
        remaining = budget.cap().saturating_sub(decision.count),
        "scrape call authorized"
    );

    match client
        .fetch_recent_posts(&account.handle, POSTS_PER_ACCOUNT)
        .await
    {
        Ok(posts) => {
            for post in &posts {
                bakewatch_db::upsert_post(
                    pool,
                    account.id,
                    &post.url,
                    &post.content,
                    post.published_at,
                )
                .await?;
            }
            tracing::info!(
                handle = %account.handle,
                stored = posts.len(),
                "scraped and stored posts"
            );
            Ok(ScrapeStep::Done(AccountOutcome::Scraped {
                handle: account.handle.clone(),
                posts: posts.len(),
            }))
        }
        Err(e) => {
            tracing::error!(
                handle = %account.handle,
                error = %e,
                "scrape request failed; skipping account"
            );
            Ok(ScrapeStep::Done(AccountOutcome::Failed {
                handle: account.handle.clone(),
                reason: e.to_string(),
            }))
        }
    }
}
