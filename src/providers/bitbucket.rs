// ABOUTME: Bitbucket Cloud REST API client implementing the RepositoryHost trait
// ABOUTME: Handles bearer auth, pagination via the `next` link, and response reshaping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::core::{Commit, Repository, RepositoryHost, WorkspaceValidation};
use crate::config::BitbucketConfig;
use crate::constants::{limits, service_names};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::utils::http_client::create_client_with_timeout;

/// One page of a Bitbucket paginated collection
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BitbucketRepository {
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: String,
    description: Option<String>,
    updated_on: Option<String>,
}

impl From<BitbucketRepository> for Repository {
    fn from(repo: BitbucketRepository) -> Self {
        Self {
            name: repo.name,
            slug: repo.slug,
            description: repo.description,
            updated_on: repo.updated_on,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BitbucketAuthor {
    raw: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BitbucketCommit {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    message: String,
    author: Option<BitbucketAuthor>,
    date: Option<String>,
}

impl From<BitbucketCommit> for Commit {
    fn from(commit: BitbucketCommit) -> Self {
        Self {
            hash: commit.hash,
            message: commit.message,
            author: commit.author.and_then(|author| author.raw),
            date: commit.date,
        }
    }
}

/// Bitbucket Cloud client
#[derive(Debug, Clone)]
pub struct BitbucketProvider {
    base_url: Url,
    validation_client: Client,
    request_client: Client,
    page_len: u32,
    max_pages: u32,
}

impl BitbucketProvider {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base `URL` does not parse or
    /// cannot carry path segments
    pub fn new(config: &BitbucketConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::config(format!("Invalid Bitbucket API URL: {}", config.base_url))
                .with_source(e)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "Bitbucket API URL cannot be used as a base: {}",
                config.base_url
            )));
        }

        Ok(Self {
            base_url,
            validation_client: create_client_with_timeout(
                config.validation_timeout_secs,
                limits::DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
            request_client: create_client_with_timeout(
                config.request_timeout_secs,
                limits::DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
            page_len: config.page_len,
            max_pages: config.max_pages,
        })
    }

    /// Build `{base}/seg1/seg2/...?pagelen=N`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str], page_len: u32) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::config("Bitbucket API URL cannot be used as a base"))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("pagelen", &page_len.to_string());
        Ok(url)
    }

    /// `next` links are only followed when they stay on the configured host
    fn same_origin(&self, url: &Url) -> bool {
        url.origin() == self.base_url.origin()
    }

    fn upstream_status_error(status: StatusCode) -> AppError {
        AppError::external_service(
            service_names::BITBUCKET_API,
            format!("upstream responded with status {status}"),
        )
        .with_status(status.as_u16())
    }

    /// Fetch every page of a collection, following `next` up to `max_pages`
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        operation: &str,
        workspace: &str,
        first: Url,
        token: &str,
    ) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first);
        let mut pages = 0;

        while let Some(url) = next.take() {
            let started = Instant::now();
            let response = self
                .request_client
                .get(url)
                .bearer_auth(token)
                .send()
                .await?;

            let status = response.status();
            AppLogger::log_upstream_call(
                operation,
                workspace,
                Some(status.as_u16()),
                u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            );
            if !status.is_success() {
                return Err(Self::upstream_status_error(status));
            }

            let page: Page<T> = response.json().await?;
            items.extend(page.values);
            pages += 1;

            let Some(link) = page.next else { break };
            if pages >= self.max_pages {
                warn!(
                    operation,
                    workspace,
                    pages,
                    item_count = items.len(),
                    "Stopping pagination at page limit; listing is truncated"
                );
                break;
            }
            match Url::parse(&link) {
                Ok(url) if self.same_origin(&url) => next = Some(url),
                Ok(url) => {
                    warn!(operation, next = %url, "Ignoring pagination link to another host");
                }
                Err(e) => {
                    warn!(operation, "Ignoring malformed pagination link: {e}");
                }
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl RepositoryHost for BitbucketProvider {
    fn name(&self) -> &'static str {
        "bitbucket"
    }

    async fn validate_workspace(
        &self,
        workspace: &str,
        token: &str,
    ) -> AppResult<WorkspaceValidation> {
        let url = self.endpoint(&["repositories", workspace], 1)?;

        let started = Instant::now();
        let response = self
            .validation_client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        AppLogger::log_upstream_call(
            "validate_workspace",
            workspace,
            Some(status.as_u16()),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        if status.is_success() {
            Ok(WorkspaceValidation::Valid)
        } else {
            Ok(WorkspaceValidation::Rejected {
                status: status.as_u16(),
            })
        }
    }

    async fn list_repositories(&self, workspace: &str, token: &str) -> AppResult<Vec<Repository>> {
        let url = self.endpoint(&["repositories", workspace], self.page_len)?;
        let repositories: Vec<BitbucketRepository> = self
            .fetch_all("list_repositories", workspace, url, token)
            .await?;

        Ok(repositories.into_iter().map(Repository::from).collect())
    }

    async fn list_commits(
        &self,
        workspace: &str,
        repo_slug: &str,
        token: &str,
    ) -> AppResult<Vec<Commit>> {
        let url = self.endpoint(&["repositories", workspace, repo_slug, "commits"], self.page_len)?;
        let commits: Vec<BitbucketCommit> = self
            .fetch_all("list_commits", workspace, url, token)
            .await?;

        Ok(commits.into_iter().map(Commit::from).collect())
    }
}
