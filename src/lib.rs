// ABOUTME: Main library entry point for the Bitbucket dashboard backend
// ABOUTME: Provides student/admin credential management and a Bitbucket API proxy over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

#![deny(unsafe_code)]

//! # Bitbucket Dashboard Backend
//!
//! A small HTTP backend that lets students and admins sign up and log in,
//! then proxies repository and commit listings from the Bitbucket Cloud API.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` credential store for student and admin records
//! - **Providers**: `RepositoryHost` trait with the Bitbucket implementation
//! - **Routes**: axum route groups delegating to small service structs
//! - **Server**: shared resources, middleware layers, and the serve loop
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bitbucket_dashboard::config::ServerConfig;
//! use bitbucket_dashboard::database::Database;
//! use bitbucket_dashboard::providers::create_host;
//! use bitbucket_dashboard::server::{DashboardServer, ServerResources};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database_url.to_connection_string()).await?;
//!     let host = create_host(&config.bitbucket)?;
//!
//!     let resources = Arc::new(ServerResources::new(database, host, config));
//!     DashboardServer::new(resources).run().await
//! }
//! ```

/// Configuration management
pub mod config;

/// Application constants and environment-driven defaults
pub mod constants;

/// Credential store
pub mod database;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Student and admin records
pub mod models;

/// Upstream repository hosts
pub mod providers;

/// HTTP route groups
pub mod routes;

/// Server assembly
pub mod server;

/// Shared helpers
pub mod utils;
