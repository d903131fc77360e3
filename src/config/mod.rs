//! Configuration management for the Loanbook server
//!
//! Configuration is read from environment variables (optionally seeded from a
//! `.env` file). Only `DATABASE_URL` is required; everything else has a default
//! suitable for local development.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

use crate::query_cache::CachePolicy;
use crate::views::DisplayOptions;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// Apply `migrations/` on startup
    pub run_migrations: bool,

    /// CORS allowed origins, comma separated
    pub cors_allowed_origins: Option<String>,

    /// Log level used when RUST_LOG is not a valid filter
    pub log_level: String,

    /// How long a cached query result stays fresh
    pub query_cache_ttl: Duration,

    /// Upper bound on cached query results per query kind
    pub query_cache_max_entries: usize,

    /// Extra attempts after a failed query
    pub query_retry_attempts: u32,

    /// First retry delay; doubles on each further attempt
    pub query_retry_base_delay: Duration,

    /// How long the page handler waits before rendering a loading state
    pub render_deadline: Duration,

    /// Refresh interval advertised by pages rendered in a loading state
    pub loading_refresh_seconds: u32,

    /// Symbol prefixed to monetary amounts
    pub currency_symbol: String,

    /// chrono format string for dates
    pub date_format: String,

    /// Offset from UTC, in minutes, that dates are shown in
    pub date_utc_offset_minutes: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| s.parse::<Environment>())
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let run_migrations = env::var("RUN_MIGRATIONS")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Ok(Config {
            database_url,
            environment,
            port,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5),
            run_migrations,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            query_cache_ttl: Duration::from_secs(env_or("QUERY_CACHE_TTL_SECONDS", 30)),
            query_cache_max_entries: env_or("QUERY_CACHE_MAX_ENTRIES", 1024),
            query_retry_attempts: env_or("QUERY_RETRY_ATTEMPTS", 3),
            query_retry_base_delay: Duration::from_millis(env_or(
                "QUERY_RETRY_BASE_DELAY_MS",
                1000,
            )),
            render_deadline: Duration::from_millis(env_or("RENDER_DEADLINE_MS", 1500)),
            loading_refresh_seconds: env_or("LOADING_REFRESH_SECONDS", 2),
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "$".to_string()),
            date_format: env::var("DATE_FORMAT").unwrap_or_else(|_| "%-m/%-d/%Y".to_string()),
            date_utc_offset_minutes: env_or("DATE_UTC_OFFSET_MINUTES", 0),
        })
    }

    /// Database URL with the password replaced, for logging
    pub fn database_url_masked(&self) -> String {
        if let Some(at_pos) = self.database_url.find('@') {
            if let Some(colon_pos) = self.database_url[..at_pos].rfind(':') {
                let prefix = &self.database_url[..colon_pos + 1];
                let suffix = &self.database_url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
        self.database_url.clone()
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: self.query_cache_ttl,
            max_entries: self.query_cache_max_entries,
            retry_attempts: self.query_retry_attempts,
            retry_base_delay: self.query_retry_base_delay,
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        let utc_offset = self
            .date_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    minutes = self.date_utc_offset_minutes,
                    "DATE_UTC_OFFSET_MINUTES out of range, showing dates in UTC"
                );
                Utc.fix()
            });

        DisplayOptions {
            currency_symbol: self.currency_symbol.clone(),
            date_format: self.date_format.clone(),
            utc_offset,
            loading_refresh_seconds: self.loading_refresh_seconds,
        }
    }
}

/// Boolean flag as written in env vars and query strings: `1`, `true` or `yes`
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Parse an optional variable, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
