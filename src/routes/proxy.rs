// ABOUTME: Bitbucket proxy route handlers for repository and commit listings
// ABOUTME: Checks caller-supplied workspace, slug, and bearer token before any upstream call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Proxy routes
//!
//! The caller supplies the workspace (and repository slug) as query
//! parameters and the Bitbucket access token as a bearer token. Upstream
//! failures are reported with a fixed message; an upstream error status is
//! kept, transport failures become 500.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::{non_empty, query_params};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::providers::{Commit, Repository, RepositoryHost};
use crate::server::ServerResources;
use crate::utils::auth::bearer_token_from_headers;
use crate::utils::json_responses::json_response;

/// Query for the projects endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    /// Bitbucket workspace
    pub workspace: Option<String>,
}

/// Query for the commits endpoint
#[derive(Debug, Default, Deserialize)]
pub struct CommitsQuery {
    /// Bitbucket workspace
    pub workspace: Option<String>,
    /// Repository slug
    #[serde(rename = "repoSlug")]
    pub repo_slug: Option<String>,
}

/// Repository listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct RepositoriesResponse {
    /// Always `true`
    pub success: bool,
    /// Repositories in upstream order
    pub repositories: Vec<Repository>,
}

/// Commit listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct CommitsResponse {
    /// Always `true`
    pub success: bool,
    /// Commits in upstream order
    pub commits: Vec<Commit>,
}

/// Forwards listing calls to the repository host
pub struct ProxyService {
    host: Arc<dyn RepositoryHost>,
}

impl ProxyService {
    /// Build the service from shared server resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        Self {
            host: resources.host.clone(),
        }
    }

    /// Replace the upstream error message, keeping its status when it has one
    fn fetch_failure(error: AppError, message: &str) -> AppError {
        let status = error.status_override.unwrap_or(500);
        AppError::new(ErrorCode::ExternalServiceError, message)
            .with_status(status)
            .with_source(error)
    }

    /// List the repositories of a workspace
    ///
    /// # Errors
    ///
    /// Returns a 400 error if the workspace or token is missing, and a fetch
    /// error if the upstream call fails
    pub async fn list_repositories(
        &self,
        workspace: Option<String>,
        token: Option<String>,
    ) -> AppResult<Vec<Repository>> {
        let (Some(workspace), Some(token)) = (non_empty(workspace), non_empty(token)) else {
            return Err(AppError::invalid_input(error_messages::PROJECTS_PARAMS_REQUIRED));
        };

        self.host
            .list_repositories(&workspace, &token)
            .await
            .map_err(|e| Self::fetch_failure(e, error_messages::REPOSITORIES_FETCH_FAILED))
    }

    /// List the commits of a repository
    ///
    /// # Errors
    ///
    /// Returns a 400 error if the workspace, slug, or token is missing, and a
    /// fetch error if the upstream call fails
    pub async fn list_commits(
        &self,
        workspace: Option<String>,
        repo_slug: Option<String>,
        token: Option<String>,
    ) -> AppResult<Vec<Commit>> {
        let (Some(workspace), Some(repo_slug), Some(token)) =
            (non_empty(workspace), non_empty(repo_slug), non_empty(token))
        else {
            return Err(AppError::invalid_input(error_messages::COMMITS_PARAMS_REQUIRED));
        };

        self.host
            .list_commits(&workspace, &repo_slug, &token)
            .await
            .map_err(|e| Self::fetch_failure(e, error_messages::COMMITS_FETCH_FAILED))
    }
}

/// Proxy routes
pub struct ProxyRoutes;

impl ProxyRoutes {
    /// Create all proxy routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/projects", get(Self::handle_projects))
            .route("/api/commits", get(Self::handle_commits))
            .with_state(resources)
    }

    async fn handle_projects(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<ProjectsQuery>, QueryRejection>,
    ) -> AppResult<Response> {
        let query = query_params(query)?;
        let repositories = ProxyService::new(&resources)
            .list_repositories(query.workspace, bearer_token_from_headers(&headers))
            .await?;

        Ok(json_response(
            RepositoriesResponse {
                success: true,
                repositories,
            },
            StatusCode::OK,
        )
        .into_response())
    }

    async fn handle_commits(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<CommitsQuery>, QueryRejection>,
    ) -> AppResult<Response> {
        let query = query_params(query)?;
        let commits = ProxyService::new(&resources)
            .list_commits(
                query.workspace,
                query.repo_slug,
                bearer_token_from_headers(&headers),
            )
            .await?;

        Ok(json_response(
            CommitsResponse {
                success: true,
                commits,
            },
            StatusCode::OK,
        )
        .into_response())
    }
}
