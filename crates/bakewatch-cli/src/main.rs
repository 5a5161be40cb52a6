use clap::{Parser, Subcommand};

mod accounts;
mod crawl;
mod status;

#[derive(Debug, Parser)]
#[command(name = "bakewatch")]
#[command(about = "Bakery Instagram crawl pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the crawl pipeline or one of its stages
    Crawl {
        #[command(subcommand)]
        command: crawl::CrawlCommands,
    },
    /// Manage the watched Instagram accounts
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountsCommands,
    },
    /// Show crawl lease state, budget usage, and per-account state
    Status,
    /// Force-release a stuck crawl lease
    ResetStatus,
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match bakewatch_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::debug!(env = %config.env, "configuration loaded");

    let pool = bakewatch_db::connect_pool(
        &config.database_url,
        bakewatch_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match cli.command {
        Commands::Crawl { command } => crawl::run(&pool, &config, command).await,
        Commands::Accounts { command } => accounts::run(&pool, command).await,
        Commands::Status => status::run_status(&pool, &config).await,
        Commands::ResetStatus => status::run_reset_status(&pool).await,
        Commands::Migrate => {
            let applied = bakewatch_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
            Ok(())
        }
    }
}
