// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Configuration module for the Bitbucket dashboard backend
//!
//! All settings come from environment variables; see
//! [`environment::ServerConfig::from_env`] for the full list.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    BitbucketConfig, DatabaseUrl, Environment, LogLevel, SecurityConfig, ServerConfig,
};
