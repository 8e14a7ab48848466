//! Board server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Board server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port (API + live WebSocket)
    pub http_port: u16,
    /// PostgreSQL connection URL; in-memory store when unset
    pub database_url: Option<String>,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Upper bound for a single store call
    pub store_timeout: Duration,
    /// Live connections allowed per board
    pub max_connections_per_board: usize,
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// JSON console logs
    pub log_json: bool,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<String>,
    /// Owner notifications are POSTed here when set, logged otherwise
    pub notify_webhook_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 8080,
            database_url: None,
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            store_timeout: Duration::from_millis(5000),
            max_connections_per_board: 64,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            notify_webhook_url: None,
        }
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = Self::default();

        Ok(Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(defaults.http_port),
            database_url: env_non_empty("DATABASE_URL"),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            store_timeout: env_parse("STORE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
            max_connections_per_board: env_parse("MAX_CONNECTIONS_PER_BOARD")
                .unwrap_or(defaults.max_connections_per_board),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: env_parse("LOG_JSON").unwrap_or(defaults.log_json),
            log_dir: env_non_empty("LOG_DIR"),
            notify_webhook_url: env_non_empty("NOTIFY_WEBHOOK_URL"),
            environment,
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_is_fatal_outside_development() {
        let err = Config::require_secret("BOARD_TEST_UNSET_SECRET", "production").unwrap_err();
        assert!(err.to_string().contains("must be set"));
    }

    #[test]
    fn missing_secret_gets_dev_placeholder() {
        let secret = Config::require_secret("BOARD_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(secret, "dev-BOARD_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.max_connections_per_board, 64);
        assert!(config.database_url.is_none());
    }
}
