// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory server resources, a stub repository host, and seed helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `bitbucket_dashboard`

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::Router;
use bitbucket_dashboard::{
    config::{Environment, SecurityConfig, ServerConfig},
    constants::service_names,
    database::Database,
    errors::{AppError, AppResult},
    providers::{Commit, Repository, RepositoryHost, WorkspaceValidation},
    server::{build_router, ServerResources},
};
use serde_json::{json, Value};

static INIT_LOGGER: Once = Once::new();

/// Lowest cost bcrypt accepts; keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// What a stubbed upstream call should do
#[derive(Debug, Clone)]
pub enum StubOutcome<T> {
    /// Answer successfully
    Ok(T),
    /// Answer with a non-success upstream status
    UpstreamStatus(u16),
    /// Fail as if the upstream could not be reached
    Unreachable,
}

impl<T: Clone> StubOutcome<T> {
    fn resolve(&self) -> AppResult<T> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::UpstreamStatus(status) => Err(AppError::external_service(
                service_names::BITBUCKET_API,
                format!("upstream responded with status {status}"),
            )
            .with_status(*status)),
            Self::Unreachable => Err(AppError::external_service(
                service_names::BITBUCKET_API,
                "connection failed",
            )),
        }
    }
}

/// In-process repository host recording every call it receives
pub struct StubHost {
    validation: StubOutcome<WorkspaceValidation>,
    repositories: StubOutcome<Vec<Repository>>,
    commits: StubOutcome<Vec<Commit>>,
    calls: Mutex<Vec<String>>,
}

impl Default for StubHost {
    fn default() -> Self {
        Self {
            validation: StubOutcome::Ok(WorkspaceValidation::Valid),
            repositories: StubOutcome::Ok(sample_repositories()),
            commits: StubOutcome::Ok(sample_commits()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubHost {
    /// Answer workspace validation with `outcome`
    pub fn with_validation(mut self, outcome: StubOutcome<WorkspaceValidation>) -> Self {
        self.validation = outcome;
        self
    }

    /// Answer repository listings with `outcome`
    pub fn with_repositories(mut self, outcome: StubOutcome<Vec<Repository>>) -> Self {
        self.repositories = outcome;
        self
    }

    /// Answer commit listings with `outcome`
    pub fn with_commits(mut self, outcome: StubOutcome<Vec<Commit>>) -> Self {
        self.commits = outcome;
        self
    }

    /// Calls received so far, as `operation:arg1:arg2...`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RepositoryHost for StubHost {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn validate_workspace(
        &self,
        workspace: &str,
        token: &str,
    ) -> AppResult<WorkspaceValidation> {
        self.record(format!("validate:{workspace}:{token}"));
        self.validation.resolve()
    }

    async fn list_repositories(&self, workspace: &str, token: &str) -> AppResult<Vec<Repository>> {
        self.record(format!("repositories:{workspace}:{token}"));
        self.repositories.resolve()
    }

    async fn list_commits(
        &self,
        workspace: &str,
        repo_slug: &str,
        token: &str,
    ) -> AppResult<Vec<Commit>> {
        self.record(format!("commits:{workspace}:{repo_slug}:{token}"));
        self.commits.resolve()
    }
}

pub fn sample_repositories() -> Vec<Repository> {
    vec![
        Repository {
            name: "Alpha".to_owned(),
            slug: "alpha".to_owned(),
            description: Some("first".to_owned()),
            updated_on: Some("2024-03-01T10:00:00.000000+00:00".to_owned()),
        },
        Repository {
            name: "Beta".to_owned(),
            slug: "beta".to_owned(),
            description: None,
            updated_on: Some("2024-02-01T10:00:00.000000+00:00".to_owned()),
        },
    ]
}

pub fn sample_commits() -> Vec<Commit> {
    vec![Commit {
        hash: "a1b2c3".to_owned(),
        message: "Initial commit\n".to_owned(),
        author: Some("Jane Doe <jane@example.com>".to_owned()),
        date: Some("2024-03-01T10:00:00+00:00".to_owned()),
    }]
}

/// Server configuration tuned for tests
pub fn test_config() -> ServerConfig {
    ServerConfig {
        environment: Environment::Testing,
        security: SecurityConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
            ..SecurityConfig::default()
        },
        ..ServerConfig::default()
    }
}

/// In-memory server resources over `host` and `config`
pub async fn create_test_server_resources_with(
    host: Arc<StubHost>,
    config: ServerConfig,
) -> Arc<ServerResources> {
    init_test_logging();
    let database = Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Arc::new(ServerResources::new(database, host, config))
}

/// In-memory server resources with the default test configuration
pub async fn create_test_server_resources(host: Arc<StubHost>) -> Arc<ServerResources> {
    create_test_server_resources_with(host, test_config()).await
}

/// Full application router over fresh resources
pub async fn create_test_app(host: Arc<StubHost>) -> (Router, Arc<ServerResources>) {
    let resources = create_test_server_resources(host).await;
    (build_router(&resources), resources)
}

/// The example signup payload used across tests
pub fn student_payload(username: &str, service_id: &str) -> Value {
    json!({
        "serviceId": service_id,
        "name": "A",
        "groupNumber": "G1",
        "username": username,
        "password": "p1",
        "token": "t1",
        "workspaceName": "w1"
    })
}
