// ABOUTME: JSON response utilities shared by the route handlers
// ABOUTME: Pairs a status code with a serialized body and builds the common success shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Helper function for JSON responses with status
pub fn json_response<T: serde::Serialize>(value: T, status: StatusCode) -> impl IntoResponse {
    (status, Json(value))
}

/// `{message}` body used by the signup routes
#[must_use]
pub fn message_only(message: &str) -> Value {
    json!({ "message": message })
}

/// `{success: true, data}` body used by the list routes
#[must_use]
pub fn success_with_data(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// `{success: true, message, data}` body used by the delete routes
#[must_use]
pub fn detailed_success(message: &str, data: Value) -> Value {
    json!({
        "success": true,
        "message": message,
        "data": data
    })
}
