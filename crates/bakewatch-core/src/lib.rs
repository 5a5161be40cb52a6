use thiserror::Error;

mod app_config;
mod budget;
mod config;

pub use app_config::{AppConfig, Environment};
pub use budget::{BudgetDecision, BudgetError, MonthlyBudget};
pub use config::{load_app_config, load_app_config_from_env};

/// Number of most-recent posts kept per account by the scrape stage and read
/// back by the summarize stage.
pub const POSTS_PER_ACCOUNT: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
