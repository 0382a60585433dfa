// ABOUTME: Route module organization for the dashboard HTTP endpoints
// ABOUTME: Provides route groups by domain plus shared request-parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Route module for the Bitbucket dashboard backend
//!
//! Each domain module exposes a `XRoutes::routes(resources)` constructor and
//! thin handlers that delegate to a service struct. Handlers return
//! [`AppResult`] so every failure goes through the shared error envelope.

/// Admin signup, login, listing, and deletion
pub mod admins;
/// Student login with workspace validation
pub mod auth;
/// Liveness and readiness routes
pub mod health;
/// Repository and commit listing proxy
pub mod proxy;
/// Student signup, listing, and deletion
pub mod students;

pub use admins::{AdminRoutes, AdminService};
pub use auth::{AuthRoutes, AuthService, LoginRequest, LoginResponse};
pub use health::HealthRoutes;
pub use proxy::{ProxyRoutes, ProxyService};
pub use students::{StudentRoutes, StudentService, StudentSignupRequest};

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};

/// Unwrap a `JSON` body, turning extractor rejections into a 400 envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!("Rejected request body: {rejection}");
            Err(AppError::invalid_input(error_messages::INVALID_JSON_BODY)
                .with_details(serde_json::json!({ "reason": rejection.body_text() })))
        }
    }
}

/// Unwrap query parameters, turning extractor rejections into a 400 envelope
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => {
            debug!("Rejected query string: {rejection}");
            Err(AppError::invalid_input(error_messages::INVALID_QUERY_STRING)
                .with_details(serde_json::json!({ "reason": rejection.body_text() })))
        }
    }
}

/// Treat empty strings the same as absent values
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Accept a string or a number for a text field; anything else counts as absent
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Router fallback for unknown paths
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    AppError::new(
        crate::errors::ErrorCode::ResourceNotFound,
        error_messages::ROUTE_NOT_FOUND,
    )
}
