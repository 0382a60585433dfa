// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{env_config, limits};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and other configurations
///
/// Only an explicit `development` value selects [`Environment::Development`];
/// unset or unrecognized values fall back to production.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; error responses include source traces
    Development,
    /// Production deployment
    #[default]
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Self::Development,
            "testing" | "test" => Self::Testing,
            _ => Self::Production,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for connection strings with an unsupported scheme
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" || path_str.is_empty() {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if let Some((scheme, _)) = s.split_once("://") {
            Err(anyhow!("Unsupported database URL scheme: {scheme}"))
        } else {
            // Fallback: treat as SQLite file path
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/dashboard.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Bitbucket `API` client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitbucketConfig {
    /// `API` base `URL` (no trailing slash)
    pub base_url: String,
    /// Timeout for the login-time workspace validation call
    pub validation_timeout_secs: u64,
    /// Timeout for listing calls
    pub request_timeout_secs: u64,
    /// Items requested per upstream page
    pub page_len: u32,
    /// Upstream pages followed before stopping
    pub max_pages: u32,
}

impl Default for BitbucketConfig {
    fn default() -> Self {
        Self {
            base_url: crate::constants::endpoints::BITBUCKET_API_BASE.to_owned(),
            validation_timeout_secs: limits::DEFAULT_VALIDATION_TIMEOUT_SECS,
            request_timeout_secs: limits::DEFAULT_REQUEST_TIMEOUT_SECS,
            page_len: limits::DEFAULT_PAGE_LEN,
            max_pages: limits::DEFAULT_MAX_PAGES,
        }
    }
}

/// Credential handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// bcrypt work factor for stored passwords
    pub bcrypt_cost: u32,
    /// Strip password hashes and access tokens from list/delete responses
    pub redact_credentials: bool,
    /// Allowed `CORS` origins (comma separated, `*` for any)
    pub cors_allowed_origins: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: limits::DEFAULT_BCRYPT_COST,
            redact_credentials: false,
            cors_allowed_origins: "*".to_owned(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `HTTP` port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Credential store location
    pub database_url: DatabaseUrl,
    /// Upstream `API` settings
    pub bitbucket: BitbucketConfig,
    /// Credential handling settings
    pub security: SecurityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: crate::constants::ports::DEFAULT_HTTP_PORT,
            host: crate::constants::defaults::DEFAULT_HOST.to_owned(),
            log_level: LogLevel::default(),
            environment: Environment::default(),
            database_url: DatabaseUrl::default(),
            bitbucket: BitbucketConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable cannot be parsed,
    /// the database `URL` is unsupported, or validation fails
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_config::http_port(),
            host: env_config::host(),
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),
            environment: Environment::from_str_or_default(&env_config::environment()),
            database_url: DatabaseUrl::parse_url(&env_config::database_url())?,
            bitbucket: BitbucketConfig {
                base_url: env_config::bitbucket_api_base()
                    .trim_end_matches('/')
                    .to_owned(),
                validation_timeout_secs: env_var_or(
                    "BITBUCKET_VALIDATION_TIMEOUT_SECS",
                    &limits::DEFAULT_VALIDATION_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid BITBUCKET_VALIDATION_TIMEOUT_SECS value")?,
                request_timeout_secs: env_var_or(
                    "BITBUCKET_REQUEST_TIMEOUT_SECS",
                    &limits::DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid BITBUCKET_REQUEST_TIMEOUT_SECS value")?,
                page_len: env_var_or("BITBUCKET_PAGE_LEN", &limits::DEFAULT_PAGE_LEN.to_string())
                    .parse()
                    .context("Invalid BITBUCKET_PAGE_LEN value")?,
                max_pages: env_var_or(
                    "BITBUCKET_MAX_PAGES",
                    &limits::DEFAULT_MAX_PAGES.to_string(),
                )
                .parse()
                .context("Invalid BITBUCKET_MAX_PAGES value")?,
            },
            security: SecurityConfig {
                bcrypt_cost: env_var_or("BCRYPT_COST", &limits::DEFAULT_BCRYPT_COST.to_string())
                    .parse()
                    .context("Invalid BCRYPT_COST value")?,
                redact_credentials: env_var_or("REDACT_CREDENTIALS", "false")
                    .parse()
                    .context("Invalid REDACT_CREDENTIALS value")?,
                cors_allowed_origins: env_config::cors_allowed_origins(),
            },
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for zero timeouts or page sizes, page sizes above the
    /// upstream maximum, and bcrypt costs outside `4..=31`
    pub fn validate(&self) -> Result<()> {
        if self.bitbucket.validation_timeout_secs == 0 || self.bitbucket.request_timeout_secs == 0 {
            return Err(anyhow!("Bitbucket timeouts must be greater than zero"));
        }

        if self.bitbucket.page_len == 0 || self.bitbucket.page_len > limits::MAX_PAGE_LEN {
            return Err(anyhow!(
                "BITBUCKET_PAGE_LEN must be between 1 and {}",
                limits::MAX_PAGE_LEN
            ));
        }

        if self.bitbucket.max_pages == 0 {
            return Err(anyhow!("BITBUCKET_MAX_PAGES must be greater than zero"));
        }

        let bcrypt_costs = limits::MIN_BCRYPT_COST..=limits::MAX_BCRYPT_COST;
        if !bcrypt_costs.contains(&self.security.bcrypt_cost) {
            return Err(anyhow!(
                "BCRYPT_COST must be between {} and {}",
                limits::MIN_BCRYPT_COST,
                limits::MAX_BCRYPT_COST
            ));
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Bitbucket Dashboard Configuration:\n\
             - HTTP: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Bitbucket API: {}\n\
             - Credential Redaction: {}",
            self.host,
            self.http_port,
            self.environment,
            self.log_level,
            if self.database_url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.bitbucket.base_url,
            if self.security.redact_credentials {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
