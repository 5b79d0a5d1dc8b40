//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Deployment environment, selecting defaults for logging and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Testing,
    Production,
}

impl AppEnv {
    /// Parses an environment name, falling back to development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "testing" => AppEnv::Testing,
            "production" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Testing => "testing",
            AppEnv::Production => "production",
        }
    }

    fn default_log_level(&self) -> &'static str {
        match self {
            AppEnv::Development => "debug",
            AppEnv::Testing | AppEnv::Production => "info",
        }
    }
}

impl std::fmt::Display for AppEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `APP_ENV`: `development`, `testing` or `production` (default: `development`)
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"debug"` in development, else `"info"`)
/// - `DATABASE_URL`: PostgreSQL URL; carriers are kept in memory when unset
/// - `RUN_MIGRATIONS`: apply migrations at startup (default: `false`)
/// - `MOCK_CARRIER_BASE_URL`: base URL of the mock carriers (default: `http://127.0.0.1:{PORT}`)
/// - `CARRIER_TIMEOUT_MS`: per-carrier call timeout (default: `3000`)
/// - `VALIDATION_REJECTION_RATE`: simulated business-rule rejection rate (default: `0.3`)
/// - `MOCK_FAILURE_RATE`: simulated carrier outage rate (default: `0.1`)
#[derive(Debug, Clone)]
pub struct Config {
    pub env: AppEnv,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub run_migrations: bool,
    pub mock_base_url: String,
    pub carrier_timeout_ms: u64,
    pub validation_rejection_rate: f64,
    pub mock_failure_rate: f64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or_default();
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let rate = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| !v.is_nan())
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(default)
        };

        Self {
            env,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            log_level: lookup("RUST_LOG").unwrap_or_else(|| env.default_log_level().to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            run_migrations: lookup("RUN_MIGRATIONS")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            mock_base_url: lookup("MOCK_CARRIER_BASE_URL")
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}")),
            carrier_timeout_ms: lookup("CARRIER_TIMEOUT_MS")
                .and_then(|t| t.parse().ok())
                .filter(|t| *t > 0)
                .unwrap_or(3000),
            validation_rejection_rate: rate("VALIDATION_REJECTION_RATE", 0.3),
            mock_failure_rate: rate("MOCK_FAILURE_RATE", 0.1),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the per-carrier call timeout.
    pub fn carrier_timeout(&self) -> Duration {
        Duration::from_millis(self.carrier_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
