//! Crawl pipeline commands.
//!
//! `crawl run` takes the database crawl lease, runs the scrape stage then
//! the summarize stage, and releases the lease on every exit path. The two
//! stages can also be run individually without the lease, matching how they
//! are exercised during development.

mod outcome;
mod scrape;
mod summarize;

use clap::Subcommand;
use sqlx::PgPool;

use bakewatch_core::AppConfig;

pub(crate) use outcome::{AccountOutcome, StageSummary};

/// Sub-commands available under `crawl`.
#[derive(Debug, Subcommand)]
pub enum CrawlCommands {
    /// Run the full pipeline (scrape then summarize) under the crawl lease
    Run,
    /// Run only the scrape stage
    Scrape,
    /// Run only the summarize stage
    Summarize,
}

pub(crate) async fn run(
    pool: &PgPool,
    config: &AppConfig,
    command: CrawlCommands,
) -> anyhow::Result<()> {
    match command {
        CrawlCommands::Run => run_pipeline(pool, config).await,
        CrawlCommands::Scrape => {
            let summary = scrape::run_scrape(pool, config).await?;
            println!("{}", summary.render("scrape"));
            Ok(())
        }
        CrawlCommands::Summarize => {
            let summary = summarize::run_summarize(pool, config).await?;
            println!("{}", summary.render("summarize"));
            Ok(())
        }
    }
}

/// Runs scrape then summarize under the crawl lease.
///
/// A stage error is logged, not propagated: the run counts as completed
/// with errors and the process still exits 0. The lease is released on
/// every exit path, best-effort.
async fn run_pipeline(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let ttl_secs = i64::try_from(config.crawl_lease_ttl_secs).unwrap_or(i64::MAX);

    match bakewatch_db::try_acquire_crawl_lease(pool, ttl_secs).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("another crawl run holds the lease; skipping this run");
            println!("crawl already in progress; nothing to do");
            return Ok(());
        }
        // The lease is advisory: a failed flag write must not block the run.
        Err(e) => tracing::warn!(error = %e, "failed to acquire crawl lease"),
    }

    let result = async {
        tracing::info!("starting scrape stage");
        let scrape_summary = scrape::run_scrape(pool, config).await?;
        tracing::info!("starting summarize stage");
        let summarize_summary = summarize::run_summarize(pool, config).await?;
        Ok::<_, anyhow::Error>((scrape_summary, summarize_summary))
    }
    .await;

    match result {
        Ok((scrape_summary, summarize_summary)) => {
            println!("{}", scrape_summary.render("scrape"));
            println!("{}", summarize_summary.render("summarize"));
        }
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "crawl pipeline failed");
        }
    }

    release_lease_best_effort(pool).await;
    Ok(())
}

/// Attempt to release the crawl lease, logging any failure.
async fn release_lease_best_effort(pool: &PgPool) {
    if let Err(e) = bakewatch_db::release_crawl_lease(pool).await {
        tracing::error!(error = %e, "failed to release crawl lease");
    }
}
