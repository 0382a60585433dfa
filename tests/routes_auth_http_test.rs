// ABOUTME: HTTP integration tests for student login
// ABOUTME: Covers password checks, upstream workspace validation, and failure envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::Router;
use bitbucket_dashboard::providers::WorkspaceValidation;
use common::{create_test_app, student_payload, StubHost, StubOutcome};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

async fn app_with_student(host: Arc<StubHost>) -> Router {
    let (app, _) = create_test_app(host).await;
    let status = AxumTestRequest::post("/api/students/signup")
        .json(&student_payload("u1", "S1"))
        .send(app.clone())
        .await
        .status();
    assert_eq!(status, 201);
    app
}

fn login(username: &str, password: &str) -> AxumTestRequest {
    AxumTestRequest::post("/api/login").json(&json!({"username": username, "password": password}))
}

#[tokio::test]
async fn test_login_success_returns_stored_credentials() {
    let host = Arc::new(StubHost::default());
    let app = app_with_student(host.clone()).await;

    let response = login("u1", "p1").send(app).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Login successful",
            "workspace": "w1",
            "token": "t1",
            "user": {"username": "u1", "workspace": "w1"}
        })
    );
    assert_eq!(host.calls(), vec!["validate:w1:t1".to_owned()]);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_look_the_same() {
    let host = Arc::new(StubHost::default());
    let app = app_with_student(host.clone()).await;

    let wrong_password = login("u1", "wrong").send(app.clone()).await;
    let unknown_user = login("nobody", "p1").send(app).await;

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    let wrong_password: Value = wrong_password.json();
    let unknown_user: Value = unknown_user.json();
    assert_eq!(wrong_password["message"], "Invalid username or password.");
    assert_eq!(wrong_password["message"], unknown_user["message"]);
    assert_eq!(wrong_password["error"]["code"], unknown_user["error"]["code"]);

    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_login_missing_credentials() {
    let host = Arc::new(StubHost::default());
    let (app, _) = create_test_app(host.clone()).await;

    for payload in [json!({}), json!({"username": "u1"}), json!({"password": "p1"})] {
        let response = AxumTestRequest::post("/api/login")
            .json(&payload)
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 400);
        let body: Value = response.json();
        assert_eq!(body["message"], "Username and password are required.");
    }

    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_login_rejected_workspace_does_not_leak_token() {
    let host = Arc::new(StubHost::default().with_validation(StubOutcome::Ok(
        WorkspaceValidation::Rejected { status: 403 },
    )));
    let app = app_with_student(host).await;

    let response = login("u1", "p1").send(app).await;

    assert_eq!(response.status(), 401);
    let text = response.text();
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Workspace or token validation failed.");
    assert_eq!(body["error"]["code"], "EXTERNAL_AUTH_FAILED");
    assert_eq!(body["error"]["details"]["upstreamStatus"], 403);
    assert!(!text.contains("\"t1\""));
}

#[tokio::test]
async fn test_login_unreachable_upstream_is_server_error() {
    let host = Arc::new(StubHost::default().with_validation(StubOutcome::Unreachable));
    let app = app_with_student(host).await;

    let response = login("u1", "p1").send(app).await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_malformed_json() {
    let (app, _) = create_test_app(Arc::new(StubHost::default())).await;

    let response = AxumTestRequest::post("/api/login")
        .raw_json("not json")
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Request body must be valid JSON");
}
