use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// API key for the Instagram-scraping provider. Optional at startup; the
    /// scrape stage skips itself when it is absent.
    pub scrape_api_key: Option<String>,
    pub scrape_base_url: String,
    /// API key for the summarization provider. Optional at startup; the
    /// summarize stage skips itself when it is absent.
    pub summary_api_key: Option<String>,
    pub summary_base_url: String,
    pub summary_model: String,
    pub request_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub budget_path: PathBuf,
    pub monthly_call_cap: u32,
    pub budget_retain_months: u32,
    pub crawl_lease_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "scrape_api_key",
                &self.scrape_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("scrape_base_url", &self.scrape_base_url)
            .field(
                "summary_api_key",
                &self.summary_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("summary_base_url", &self.summary_base_url)
            .field("summary_model", &self.summary_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("budget_path", &self.budget_path)
            .field("monthly_call_cap", &self.monthly_call_cap)
            .field("budget_retain_months", &self.budget_retain_months)
            .field("crawl_lease_ttl_secs", &self.crawl_lease_ttl_secs)
            .finish()
    }
}
