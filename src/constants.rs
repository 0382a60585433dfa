// ABOUTME: System-wide constants and environment-driven defaults for the dashboard backend
// ABOUTME: Holds upstream endpoints, ports, limits, and the user-facing messages of every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! # Constants Module
//!
//! Application constants and environment-based configuration values.
//! This module provides both hardcoded constants and environment variable configuration.

use std::env;

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get `HTTP` server port from environment or default
    ///
    /// `PORT` takes precedence so platform-assigned ports work unchanged.
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("PORT")
            .or_else(|_| env::var("HTTP_PORT"))
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::ports::DEFAULT_HTTP_PORT)
    }

    /// Get bind address from environment or default
    #[must_use]
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| super::defaults::DEFAULT_HOST.into())
    }

    /// Get database `URL` from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| super::defaults::DEFAULT_DATABASE_URL.into())
    }

    /// Get deployment environment name
    #[must_use]
    pub fn environment() -> String {
        env::var("NODE_ENV")
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "production".into())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into())
    }

    /// Get Bitbucket `API` base `URL`
    #[must_use]
    pub fn bitbucket_api_base() -> String {
        env::var("BITBUCKET_API_URL").unwrap_or_else(|_| super::endpoints::BITBUCKET_API_BASE.into())
    }

    /// Get allowed `CORS` origins (comma separated, `*` for any)
    #[must_use]
    pub fn cors_allowed_origins() -> String {
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into())
    }
}

/// External service endpoints
pub mod endpoints {
    /// Bitbucket Cloud REST `API` base
    pub const BITBUCKET_API_BASE: &str = "https://api.bitbucket.org/2.0";
}

/// Network ports
pub mod ports {
    /// Default `HTTP` port
    pub const DEFAULT_HTTP_PORT: u16 = 4000;
}

/// Default values for configuration
pub mod defaults {
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Default credential store
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/dashboard.db";
}

/// Limits for outbound calls and password hashing
pub mod limits {
    /// Timeout for the login-time workspace validation call
    pub const DEFAULT_VALIDATION_TIMEOUT_SECS: u64 = 5;
    /// Timeout for repository and commit listing calls
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Connection timeout for every upstream call
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
    /// Items requested per upstream page
    pub const DEFAULT_PAGE_LEN: u32 = 100;
    /// Upstream pages followed before stopping
    pub const DEFAULT_MAX_PAGES: u32 = 10;
    /// Largest `pagelen` Bitbucket accepts
    pub const MAX_PAGE_LEN: u32 = 100;
    /// bcrypt work factor for stored passwords
    pub const DEFAULT_BCRYPT_COST: u32 = 10;
    /// Lowest work factor bcrypt accepts
    pub const MIN_BCRYPT_COST: u32 = 4;
    /// Highest work factor bcrypt accepts
    pub const MAX_BCRYPT_COST: u32 = 31;
}

/// Service names for structured logging
pub mod service_names {
    /// This server
    pub const DASHBOARD_SERVER: &str = "bitbucket-dashboard";
    /// Upstream service label used in error messages
    pub const BITBUCKET_API: &str = "Bitbucket API";
}

/// User-facing messages returned by the routes
pub mod error_messages {
    /// Login without username or password
    pub const CREDENTIALS_REQUIRED: &str = "Username and password are required.";
    /// Unknown user or wrong password
    pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
    /// Stored workspace/token rejected upstream
    pub const WORKSPACE_VALIDATION_FAILED: &str = "Workspace or token validation failed.";
    /// Repository listing without workspace or token
    pub const PROJECTS_PARAMS_REQUIRED: &str = "Workspace and access token are required.";
    /// Commit listing without workspace, slug or token
    pub const COMMITS_PARAMS_REQUIRED: &str =
        "Workspace, repoSlug, and access token are required.";
    /// Repository listing failed upstream
    pub const REPOSITORIES_FETCH_FAILED: &str =
        "Failed to fetch repositories. Check your workspace or token.";
    /// Commit listing failed upstream
    pub const COMMITS_FETCH_FAILED: &str =
        "Failed to fetch commits. Check your workspace, repoSlug, or token.";
    /// Signup with missing fields
    pub const REQUIRED_FIELDS_MISSING: &str = "Required fields are missing";
    /// Username taken
    pub const USERNAME_EXISTS: &str = "Username already exists";
    /// Service ID taken
    pub const SERVICE_ID_EXISTS: &str = "Service ID already exists";
    /// Malformed `JSON` body
    pub const INVALID_JSON_BODY: &str = "Request body must be valid JSON";
    /// Query string that cannot be parsed
    pub const INVALID_QUERY_STRING: &str = "Query parameters are invalid";
    /// No route matched
    pub const ROUTE_NOT_FOUND: &str = "Route not found";
    /// Unhandled failure
    pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
}

/// Success messages returned by the routes
pub mod messages {
    /// Student signup succeeded
    pub const STUDENT_REGISTERED: &str = "Student registered successfully";
    /// Admin signup succeeded
    pub const ADMIN_REGISTERED: &str = "Admin registered successfully";
    /// Student deleted
    pub const STUDENT_DELETED: &str = "Student deleted successfully";
    /// Admin deleted
    pub const ADMIN_DELETED: &str = "Admin deleted successfully";
    /// Login succeeded
    pub const LOGIN_SUCCESSFUL: &str = "Login successful";
    /// Root liveness text
    pub const BACKEND_RUNNING: &str = "Bitbucket Dashboard Backend is running.";
}
