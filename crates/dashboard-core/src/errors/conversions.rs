// ABOUTME: Feature-gated conversions from library errors into AppError
// ABOUTME: Keeps sqlx and reqwest optional so the core crate stays light
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for super::AppError {
    fn from(error: sqlx::Error) -> Self {
        let message = match &error {
            sqlx::Error::RowNotFound => "Record not found".to_owned(),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                "Database connection unavailable".to_owned()
            }
            other => format!("Database operation failed: {other}"),
        };
        Self::database(message).with_source(error)
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for super::AppError {
    fn from(error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_owned()
        } else if error.is_connect() {
            "connection failed".to_owned()
        } else if error.is_decode() {
            "unexpected response body".to_owned()
        } else {
            error.to_string()
        };
        // Client errors keep their upstream status; everything else stays a 500
        let status = error
            .status()
            .map(|status| status.as_u16())
            .filter(|code| (400..500).contains(code));
        let app_error = Self::external_service("Bitbucket API", message);
        let app_error = match status {
            Some(code) => app_error.with_status(code),
            None => app_error,
        };
        app_error.with_source(error)
    }
}
