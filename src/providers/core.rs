// ABOUTME: Core repository host trait and the reshaped repository/commit models
// ABOUTME: Defines the contract the login and proxy routes use to reach the upstream API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! # Repository Host Contract
//!
//! A [`RepositoryHost`] answers three questions for the routes: does this
//! workspace/token pair still grant access, which repositories does the
//! workspace hold, and which commits does a repository hold.
//!
//! Hosts return the reshaped models defined here rather than raw upstream
//! payloads, so the route layer never sees provider-specific fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

/// Repository summary returned by the projects endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Display name
    pub name: String,
    /// `URL`-safe identifier used in commit lookups
    pub slug: String,
    /// Free-form description, `null` when the upstream has none
    pub description: Option<String>,
    /// Last update timestamp exactly as the upstream reports it
    pub updated_on: Option<String>,
}

/// Commit summary returned by the commits endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash
    pub hash: String,
    /// Full commit message
    pub message: String,
    /// Raw author string, e.g. `Jane Doe <jane@example.com>`
    pub author: Option<String>,
    /// Commit timestamp exactly as the upstream reports it
    pub date: Option<String>,
}

/// Outcome of checking a stored workspace/token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceValidation {
    /// The upstream answered with a success status
    Valid,
    /// The upstream answered with a non-success status
    Rejected {
        /// Upstream `HTTP` status
        status: u16,
    },
}

/// Upstream repository host used by the login and proxy routes
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Host name for logging
    fn name(&self) -> &'static str;

    /// Check that `token` still grants access to `workspace`
    ///
    /// A non-success upstream status is a [`WorkspaceValidation::Rejected`]
    /// value, not an error. Errors mean the upstream could not be reached.
    async fn validate_workspace(&self, workspace: &str, token: &str)
        -> AppResult<WorkspaceValidation>;

    /// List the repositories of `workspace` in upstream order
    async fn list_repositories(&self, workspace: &str, token: &str) -> AppResult<Vec<Repository>>;

    /// List the commits of `workspace/repo_slug` in upstream order
    async fn list_commits(
        &self,
        workspace: &str,
        repo_slug: &str,
        token: &str,
    ) -> AppResult<Vec<Commit>>;
}
