// ABOUTME: Authentication utilities for bearer token extraction and bcrypt password handling
// ABOUTME: Runs all bcrypt work on blocking threads so the async executor is never stalled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use std::sync::OnceLock;

use axum::http::{header, HeaderMap};

use crate::errors::{AppError, AppResult};

/// Hash compared against when the user does not exist
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Extract the bearer token from an `Authorization` header value
///
/// The token is the second whitespace-separated segment; the scheme word is
/// not checked. Returns `None` when there is no second segment.
#[must_use]
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .split_whitespace()
        .nth(1)
        .filter(|token| !token.is_empty())
}

/// Extract the bearer token from request headers
#[must_use]
pub fn bearer_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_owned)
}

/// Hash a password with bcrypt on a blocking thread
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task panics
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal("Password hashing failed").with_source(e))
}

/// Verify a password against a stored bcrypt hash on a blocking thread
///
/// # Errors
///
/// Returns an error if the stored hash is malformed or the blocking task panics
pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal("Password verification error").with_source(e))
}

/// Spend the same bcrypt work as a real verification when the user is unknown
pub async fn verify_against_dummy(password: String, cost: u32) {
    let result = tokio::task::spawn_blocking(move || {
        let hash = DUMMY_HASH.get_or_init(|| bcrypt::hash("dashboard-dummy", cost).unwrap_or_default());
        bcrypt::verify(&password, hash).unwrap_or(false)
    })
    .await;

    if let Err(e) = result {
        tracing::warn!("Dummy password verification task failed: {e}");
    }
}
