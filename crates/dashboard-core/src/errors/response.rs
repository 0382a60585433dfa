// ABOUTME: JSON error envelope shared by every HTTP route
// ABOUTME: Converts AppError into a status code plus a {success:false, ...} body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{error_trace_enabled, AppError, ErrorCode};

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Message shown to the caller
    pub message: String,
    /// Structured error details
    pub error: ErrorResponseDetails,
    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

/// Structured part of the error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable error code
    pub code: ErrorCode,
    /// Message shown to the caller
    pub message: String,
    /// Identifier of the resource involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Source-error chain, only emitted in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Build the envelope, including the source chain when requested
    #[must_use]
    pub fn from_error(error: &AppError, include_trace: bool) -> Self {
        let trace = if include_trace {
            Some(error.source_chain()).filter(|chain| !chain.is_empty())
        } else {
            None
        };
        let errors = if error.context.field_errors.is_empty() {
            None
        } else {
            Some(error.context.field_errors.clone())
        };

        Self {
            success: false,
            message: error.message.clone(),
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message.clone(),
                resource_id: error.context.resource_id.clone(),
                details: error.context.details.clone(),
                trace,
            },
            errors,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_error(&error, error_trace_enabled())
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                code = ?self.code,
                status = status.as_u16(),
                chain = ?self.source_chain(),
                "{}",
                self.message
            );
        } else {
            tracing::debug!(code = ?self.code, status = status.as_u16(), "{}", self.message);
        }

        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::missing_fields("Required fields are missing")
            .with_field_error("name", "Name is required");
        let response = ErrorResponse::from_error(&error, false);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "MISSING_REQUIRED_FIELD");
        assert_eq!(json["errors"]["name"], "Name is required");
        assert!(json["error"].get("trace").is_none());
    }

    #[test]
    fn test_trace_only_when_enabled() {
        let error = AppError::internal("boom").with_source(std::io::Error::other("disk full"));

        let hidden = serde_json::to_value(ErrorResponse::from_error(&error, false)).unwrap();
        assert!(hidden["error"].get("trace").is_none());

        let shown = serde_json::to_value(ErrorResponse::from_error(&error, true)).unwrap();
        assert_eq!(shown["error"]["trace"][0], "disk full");
    }

    #[test]
    fn test_no_errors_map_without_field_errors() {
        let error = AppError::not_found("Student");
        let json = serde_json::to_value(ErrorResponse::from_error(&error, false)).unwrap();
        assert!(json.get("errors").is_none());
        assert_eq!(json["message"], "Student not found");
    }

    #[cfg(feature = "http-response")]
    #[test]
    fn test_into_response_uses_override() {
        use axum::response::IntoResponse;

        let response = AppError::external_service("Bitbucket API", "gone")
            .with_status(404)
            .into_response();
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }
}
