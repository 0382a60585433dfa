// ABOUTME: Repository host integrations for the dashboard proxy and login validation
// ABOUTME: Exposes the RepositoryHost trait and the Bitbucket Cloud implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Routes talk to the upstream API only through [`RepositoryHost`], so tests
//! can swap in a stub host without any network access.

/// Bitbucket Cloud REST client
pub mod bitbucket;
/// Shared trait and response models
pub mod core;

use std::sync::Arc;

pub use self::bitbucket::BitbucketProvider;
pub use self::core::{Commit, Repository, RepositoryHost, WorkspaceValidation};

use crate::config::BitbucketConfig;

/// Create the production repository host
///
/// # Errors
///
/// Returns an error if the configured base `URL` is invalid
pub fn create_host(config: &BitbucketConfig) -> crate::errors::AppResult<Arc<dyn RepositoryHost>> {
    Ok(Arc::new(BitbucketProvider::new(config)?))
}
