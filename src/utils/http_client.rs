// ABOUTME: Shared HTTP client construction with timeout configuration
// ABOUTME: Builds the reqwest clients used for Bitbucket validation and listing calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::constants::service_names;

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(concat!("bitbucket-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(
                service = service_names::DASHBOARD_SERVER,
                "Falling back to default HTTP client: {e}"
            );
            Client::new()
        })
}
