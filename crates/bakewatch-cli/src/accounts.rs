//! Target-account management commands.

use clap::Subcommand;
use sqlx::PgPool;

/// Sub-commands available under `accounts`.
#[derive(Debug, Subcommand)]
pub enum AccountsCommands {
    /// Register a new Instagram account to watch
    Add {
        /// The account handle, with or without a leading `@`
        handle: String,
    },
    /// List all registered accounts
    List,
}

pub(crate) async fn run(pool: &PgPool, command: AccountsCommands) -> anyhow::Result<()> {
    match command {
        AccountsCommands::Add { handle } => run_add(pool, &handle).await,
        AccountsCommands::List => run_list(pool).await,
    }
}

async fn run_add(pool: &PgPool, handle: &str) -> anyhow::Result<()> {
    let handle = handle.trim().trim_start_matches('@');
    if handle.is_empty() {
        anyhow::bail!("account handle must not be empty");
    }

    let row = bakewatch_db::create_target_account(pool, handle).await?;
    println!("added account @{} (id {})", row.handle, row.id);
    Ok(())
}

async fn run_list(pool: &PgPool) -> anyhow::Result<()> {
    let accounts = bakewatch_db::list_accounts(pool).await?;
    if accounts.is_empty() {
        println!("no accounts registered; run `accounts add <handle>` first");
        return Ok(());
    }

    println!("{:<28}{:<10}LAST SCRAPED", "HANDLE", "STATUS");
    for account in &accounts {
        let last_scraped = account.last_scraped_at.map_or_else(
            || "\u{2014}".to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );
        println!("{:<28}{:<10}{last_scraped}", account.handle, account.status);
    }

    Ok(())
}
