//! Configuration module for the portal data core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the local cache (one JSON file per key)
    pub data_dir: PathBuf,
    /// Base URL of the remote document API; absent means remote sync is disabled
    pub remote_base_url: Option<String>,
    /// API key sent as `x-api-key` to the remote document API
    pub remote_api_key: Option<String>,
    /// Polling interval for live document subscriptions
    pub poll_interval: Duration,
    /// Base URL of the text-completion service; absent means the assistant
    /// answers with its fallback sentence only
    pub assistant_url: Option<String>,
    /// API key for the text-completion service
    pub assistant_api_key: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = env::var("PORTAL_DATA_DIR")
            .unwrap_or_else(|_| "./data/cache".to_string())
            .into();

        let remote_base_url = env::var("PORTAL_REMOTE_URL").ok();
        let remote_api_key = env::var("PORTAL_REMOTE_API_KEY").ok();

        let poll_interval = env::var("PORTAL_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(15));

        let assistant_url = env::var("PORTAL_ASSISTANT_URL").ok();
        let assistant_api_key = env::var("PORTAL_ASSISTANT_API_KEY").ok();

        let log_level = env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            data_dir,
            remote_base_url,
            remote_api_key,
            poll_interval,
            assistant_url,
            assistant_api_key,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("PORTAL_DATA_DIR");
        env::remove_var("PORTAL_REMOTE_URL");
        env::remove_var("PORTAL_REMOTE_API_KEY");
        env::remove_var("PORTAL_POLL_INTERVAL_MS");
        env::remove_var("PORTAL_ASSISTANT_URL");
        env::remove_var("PORTAL_ASSISTANT_API_KEY");
        env::remove_var("PORTAL_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.data_dir, PathBuf::from("./data/cache"));
        assert!(config.remote_base_url.is_none());
        assert!(config.remote_api_key.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert!(config.assistant_url.is_none());
        assert_eq!(config.log_level, "info");
    }
}
