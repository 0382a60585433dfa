// ABOUTME: Integration tests for the Bitbucket provider against a local fake upstream
// ABOUTME: Covers bearer auth, pagination, page limits, status mapping, and transport failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bitbucket_dashboard::config::BitbucketConfig;
use bitbucket_dashboard::providers::{BitbucketProvider, RepositoryHost, WorkspaceValidation};
use serde_json::json;
use tokio::net::TcpListener;

const VALID_TOKEN: &str = "good-token";

#[derive(Clone)]
struct FakeUpstream {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    fn record(&self, uri: &Uri) {
        self.requests.lock().unwrap().push(uri.to_string());
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

fn page_number(uri: &Uri) -> u32 {
    uri.query()
        .unwrap_or_default()
        .split('&')
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

async fn repositories(
    State(upstream): State<FakeUpstream>,
    Path(workspace): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    upstream.record(&uri);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if workspace == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }

    // "endless" always links to another page; "escape" links off-host
    let page = page_number(&uri);
    let next = match (workspace.as_str(), page) {
        ("endless", n) => Some(format!("{}/repositories/endless?page={}", upstream.base, n + 1)),
        ("escape", _) => Some("http://192.0.2.1:9/2.0/repositories/escape?page=2".to_owned()),
        (_, 1) => Some(format!("{}/repositories/{workspace}?page=2", upstream.base)),
        _ => None,
    };

    let values = if page == 1 {
        json!([
            {"name": "Alpha", "slug": "alpha", "description": "first",
             "updated_on": "2024-03-01T10:00:00.000000+00:00", "is_private": true},
            {"name": "Beta", "slug": "beta", "description": "",
             "updated_on": "2024-02-01T10:00:00.000000+00:00"}
        ])
    } else {
        json!([{"name": format!("Page{page}"), "slug": format!("page-{page}")}])
    };

    let mut body = json!({"pagelen": 2, "page": page, "values": values});
    if let Some(next) = next {
        body["next"] = json!(next);
    }
    Json(body).into_response()
}

async fn commits(
    State(upstream): State<FakeUpstream>,
    Path((_workspace, slug)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    upstream.record(&uri);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if slug == "broken" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Json(json!({
        "values": [
            {
                "hash": "a1b2c3",
                "message": "Initial commit\n",
                "author": {"raw": "Jane Doe <jane@example.com>", "type": "author"},
                "date": "2024-03-01T10:00:00+00:00"
            },
            {
                "hash": "d4e5f6",
                "message": "Second",
                "author": {"type": "author"},
                "date": "2024-03-02T10:00:00+00:00"
            }
        ]
    }))
    .into_response()
}

async fn spawn_upstream() -> FakeUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let upstream = FakeUpstream {
        base: format!("http://{address}/2.0"),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/2.0/repositories/:workspace", get(repositories))
        .route("/2.0/repositories/:workspace/:slug/commits", get(commits))
        .with_state(upstream.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    upstream
}

fn provider_for(base: &str, max_pages: u32) -> BitbucketProvider {
    BitbucketProvider::new(&BitbucketConfig {
        base_url: base.to_owned(),
        validation_timeout_secs: 5,
        request_timeout_secs: 5,
        page_len: 2,
        max_pages,
    })
    .unwrap()
}

#[tokio::test]
async fn test_validate_workspace() {
    let upstream = spawn_upstream().await;
    let provider = provider_for(&upstream.base, 10);

    let valid = provider.validate_workspace("w1", VALID_TOKEN).await.unwrap();
    assert_eq!(valid, WorkspaceValidation::Valid);

    let rejected = provider.validate_workspace("w1", "bad-token").await.unwrap();
    assert_eq!(rejected, WorkspaceValidation::Rejected { status: 401 });

    let missing = provider.validate_workspace("missing", VALID_TOKEN).await.unwrap();
    assert_eq!(missing, WorkspaceValidation::Rejected { status: 404 });

    let requests = upstream.requests();
    assert!(requests[0].starts_with("/2.0/repositories/w1?"));
    assert!(requests[0].contains("pagelen=1"));
}

#[tokio::test]
async fn test_list_repositories_follows_pagination() {
    let upstream = spawn_upstream().await;
    let provider = provider_for(&upstream.base, 10);

    let repositories = provider.list_repositories("w1", VALID_TOKEN).await.unwrap();

    let slugs: Vec<&str> = repositories.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, ["alpha", "beta", "page-2"]);
    assert_eq!(repositories[0].description.as_deref(), Some("first"));
    assert_eq!(
        repositories[0].updated_on.as_deref(),
        Some("2024-03-01T10:00:00.000000+00:00")
    );
    assert!(repositories[2].updated_on.is_none());

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].contains("pagelen=2"));
}

#[tokio::test]
async fn test_pagination_stops_at_page_limit() {
    let upstream = spawn_upstream().await;
    let provider = provider_for(&upstream.base, 3);

    let repositories = provider
        .list_repositories("endless", VALID_TOKEN)
        .await
        .unwrap();

    assert_eq!(repositories.len(), 4);
    assert_eq!(upstream.requests().len(), 3);
}

#[tokio::test]
async fn test_pagination_ignores_links_to_other_hosts() {
    let upstream = spawn_upstream().await;
    let provider = provider_for(&upstream.base, 10);

    let repositories = provider
        .list_repositories("escape", VALID_TOKEN)
        .await
        .unwrap();

    assert_eq!(repositories.len(), 2);
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn test_list_repositories_upstream_error_keeps_status() {
    let upstream = spawn_upstream().await;
    let provider = provider_for(&upstream.base, 10);

    let unauthorized = provider.list_repositories("w1", "bad-token").await.unwrap_err();
    assert_eq!(unauthorized.http_status(), 401);

    let missing = provider
        .list_repositories("missing", VALID_TOKEN)
        .await
        .unwrap_err();
    assert_eq!(missing.http_status(), 404);
}

#[tokio::test]
async fn test_list_commits() {
    let upstream = spawn_upstream().await;
    let provider = provider_for(&upstream.base, 10);

    let commits = provider
        .list_commits("w1", "alpha", VALID_TOKEN)
        .await
        .unwrap();

    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].hash, "a1b2c3");
    assert_eq!(commits[0].message, "Initial commit\n");
    assert_eq!(commits[0].author.as_deref(), Some("Jane Doe <jane@example.com>"));
    assert!(commits[1].author.is_none());

    let requests = upstream.requests();
    assert!(requests[0].starts_with("/2.0/repositories/w1/alpha/commits?"));

    let broken = provider
        .list_commits("w1", "broken", VALID_TOKEN)
        .await
        .unwrap_err();
    assert_eq!(broken.http_status(), 500);
}

#[tokio::test]
async fn test_unreachable_upstream_is_an_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let provider = provider_for(&format!("http://{address}/2.0"), 10);

    let validation = provider.validate_workspace("w1", VALID_TOKEN).await;
    assert!(validation.is_err());

    let listing = provider.list_repositories("w1", VALID_TOKEN).await.unwrap_err();
    assert_eq!(listing.http_status(), 500);
}
