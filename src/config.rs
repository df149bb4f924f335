//! Configuration module for newsfeed.
//!
//! The configuration is read once at startup. JSON is the primary format
//! (`{"feeds": [...], "period": 5}`); files with a `.toml` extension are
//! parsed as TOML with the same keys.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::news::MAX_FEED_SIZE;
use crate::{NewsError, Result};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Longest accepted poll period in minutes (one year).
pub const MAX_PERIOD_MINUTES: i64 = 365 * 24 * 60;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for every path outside the API.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "./static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "./rss.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; output goes to stdout as well.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Total per-fetch deadline in seconds. Unset means no deadline.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Maximum number of concurrent fetches in one cycle. Unset means one
    /// fetch per source, all at once.
    #[serde(default)]
    pub max_concurrent: Option<usize>,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
}

fn default_max_feed_size() -> u64 {
    MAX_FEED_SIZE
}

impl FetchConfig {
    /// Per-fetch deadline, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            max_concurrent: None,
            max_feed_size_bytes: default_max_feed_size(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Feed source addresses, polled in every cycle.
    #[serde(default)]
    pub feeds: Vec<String>,
    /// Poll period in minutes.
    pub period: i64,
    /// Run the first cycle immediately instead of one period after start.
    #[serde(default)]
    pub poll_on_startup: bool,
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed fetching configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load and validate configuration from a file.
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(NewsError::Io)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::parse_toml(&content)?,
            _ => Self::parse(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string.
    pub fn parse(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| NewsError::Validation(format!("config parse error: {e}")))
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NewsError::Validation(format!("config parse error: {e}")))
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The poll period is zero, negative or longer than a year
    /// - `fetch.max_concurrent` is zero
    /// - `fetch.timeout_secs` is zero
    pub fn validate(&self) -> Result<()> {
        if self.period <= 0 {
            return Err(NewsError::Validation(format!(
                "period must be a positive number of minutes, got {}",
                self.period
            )));
        }
        if self.period > MAX_PERIOD_MINUTES {
            return Err(NewsError::Validation(format!(
                "period must be at most {} minutes, got {}",
                MAX_PERIOD_MINUTES, self.period
            )));
        }
        if self.fetch.max_concurrent == Some(0) {
            return Err(NewsError::Validation(
                "fetch.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.fetch.timeout_secs == Some(0) {
            return Err(NewsError::Validation(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Poll period as a duration.
    pub fn poll_period(&self) -> Duration {
        let minutes = self.period.clamp(1, MAX_PERIOD_MINUTES) as u64;
        Duration::from_secs(minutes * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let json = r#"{"feeds": ["https://example.com/rss", "https://example.org/feed"], "period": 5}"#;
        let config = Config::parse(json).unwrap();

        assert_eq!(
            config.feeds,
            vec!["https://example.com/rss", "https://example.org/feed"]
        );
        assert_eq!(config.period, 5);
        assert!(!config.poll_on_startup);

        // Defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, "./static");
        assert_eq!(config.database.path, "./rss.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        assert!(config.fetch.timeout_secs.is_none());
        assert!(config.fetch.max_concurrent.is_none());
        assert_eq!(config.fetch.max_feed_size_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "feeds": ["https://example.com/rss"],
            "period": 10,
            "poll_on_startup": true,
            "server": {"host": "127.0.0.1", "port": 3000, "static_dir": "public"},
            "database": {"path": ":memory:"},
            "logging": {"level": "debug", "file": "logs/newsfeed.log"},
            "fetch": {"timeout_secs": 30, "max_concurrent": 4, "max_feed_size_bytes": 1024}
        }"#;
        let config = Config::parse(json).unwrap();

        assert!(config.poll_on_startup);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, "public");
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("logs/newsfeed.log"));
        assert_eq!(config.fetch.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.fetch.max_concurrent, Some(4));
        assert_eq!(config.fetch.max_feed_size_bytes, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
feeds = ["https://example.com/rss"]
period = 15

[server]
port = 9000
"#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.period, 15);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_parse_missing_period() {
        let result = Config::parse(r#"{"feeds": []}"#);
        assert!(matches!(result, Err(NewsError::Validation(_))));
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not json {{{");

        assert!(result.is_err());
        if let Err(NewsError::Validation(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_validate_non_positive_period() {
        for period in [0, -3] {
            let json = format!(r#"{{"feeds": [], "period": {period}}}"#);
            let config = Config::parse(&json).unwrap();
            let result = config.validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("period"));
        }
    }

    #[test]
    fn test_validate_huge_period() {
        let config = Config::parse(r#"{"feeds": [], "period": 9223372036854775807}"#).unwrap();
        let result = config.validate();
        assert!(matches!(result, Err(NewsError::Validation(ref msg)) if msg.contains("at most")));

        let config = Config::parse(r#"{"feeds": [], "period": 525600}"#).unwrap();
        assert!(config.validate().is_ok());
        let config = Config::parse(r#"{"feeds": [], "period": 525601}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_period_never_overflows() {
        let config = Config::parse(r#"{"feeds": [], "period": 9223372036854775807}"#).unwrap();
        assert_eq!(
            config.poll_period(),
            Duration::from_secs(MAX_PERIOD_MINUTES as u64 * 60)
        );
    }

    #[test]
    fn test_validate_zero_max_concurrent() {
        let json = r#"{"feeds": [], "period": 1, "fetch": {"max_concurrent": 0}}"#;
        let config = Config::parse(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let json = r#"{"feeds": [], "period": 1, "fetch": {"timeout_secs": 0}}"#;
        let config = Config::parse(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_period() {
        let config = Config::parse(r#"{"feeds": [], "period": 3}"#).unwrap();
        assert_eq!(config.poll_period(), Duration::from_secs(180));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.json");

        assert!(result.is_err());
        assert!(matches!(result, Err(NewsError::Io(_))));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"feeds": ["https://example.com/rss"], "period": 2}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.period, 2);
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "feeds = []\nperiod = 7\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.period, 7);
    }

    #[test]
    fn test_load_rejects_invalid_period() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"feeds": [], "period": 0}"#).unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(NewsError::Validation(_))
        ));
    }
}
