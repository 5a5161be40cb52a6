//! Offline unit tests for bakewatch-db pool configuration and row types.
//! These tests do not require a live database connection.

use bakewatch_core::{AppConfig, Environment};
use bakewatch_db::{PoolConfig, PostRow, SystemStatusRow, TargetAccountRow};
use std::path::PathBuf;

fn test_app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        scrape_api_key: None,
        scrape_base_url: "https://instagram-scraper-stable-api.p.rapidapi.com".to_string(),
        summary_api_key: None,
        summary_base_url: "https://generativelanguage.googleapis.com".to_string(),
        summary_model: "gemini-2.5-flash".to_string(),
        request_timeout_secs: 30,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        budget_path: PathBuf::from("./.bakewatch/api_usage.json"),
        monthly_call_cap: 20,
        budget_retain_months: 12,
        crawl_lease_ttl_secs: 3600,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&test_app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`TargetAccountRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn target_account_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = TargetAccountRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        handle: "bakeryA".to_string(),
        status: "active".to_string(),
        last_scraped_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.handle, "bakeryA");
    assert_eq!(row.status, "active");
    assert!(row.last_scraped_at.is_none());
}

#[test]
fn post_row_publish_time_is_nullable() {
    use chrono::Utc;

    let row = PostRow {
        id: 1_i64,
        target_account_id: 1_i64,
        post_url: "https://www.instagram.com/p/ABCDE12345/".to_string(),
        post_content: String::new(),
        published_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert!(row.published_at.is_none());
    assert!(row.post_content.is_empty());
}

#[test]
fn system_status_row_models_an_idle_lease() {
    use chrono::Utc;

    let row = SystemStatusRow {
        id: "global".to_string(),
        is_crawling: false,
        crawl_started_at: None,
        updated_at: Utc::now(),
    };

    assert!(!row.is_crawling);
    assert!(row.crawl_started_at.is_none());
}
