//! Operator visibility and the manual lease reset.

use sqlx::PgPool;

use bakewatch_core::{AppConfig, MonthlyBudget};

/// Print crawl-lease state, current-month budget usage, and a per-account
/// table.
///
/// # Errors
///
/// Returns an error if the status row is missing (run `migrate` first) or a
/// query fails.
pub(crate) async fn run_status(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let status = bakewatch_db::get_system_status(pool).await?;
    if status.is_crawling {
        let since = status
            .crawl_started_at
            .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
        println!("crawl: in progress (since {since})");
    } else {
        println!("crawl: idle");
    }

    let budget = MonthlyBudget::new(
        config.budget_path.clone(),
        config.monthly_call_cap,
        config.budget_retain_months,
    );
    let used = budget.current_count()?;
    println!("budget: {used}/{} scrape calls used this month", budget.cap());

    let accounts = bakewatch_db::list_accounts(pool).await?;
    if accounts.is_empty() {
        println!("accounts: none registered");
        return Ok(());
    }

    println!();
    println!("{:<28}{:<10}{:<18}SUMMARY", "HANDLE", "STATUS", "LAST SCRAPED");
    for account in &accounts {
        let last_scraped = account.last_scraped_at.map_or_else(
            || "\u{2014}".to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );
        let has_summary = bakewatch_db::get_summary_for_account(pool, account.id)
            .await?
            .is_some();
        let summary_state = if has_summary { "yes" } else { "\u{2014}" };
        println!(
            "{:<28}{:<10}{last_scraped:<18}{summary_state}",
            account.handle, account.status
        );
    }

    Ok(())
}

/// Force-release the crawl lease, for when a crashed run left it held.
///
/// # Errors
///
/// Returns an error if the update fails.
pub(crate) async fn run_reset_status(pool: &PgPool) -> anyhow::Result<()> {
    bakewatch_db::release_crawl_lease(pool).await?;
    println!("crawl lease cleared");
    Ok(())
}
