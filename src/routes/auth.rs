// ABOUTME: Authentication route handlers for student and admin login
// ABOUTME: Verifies bcrypt hashes and, for students, re-validates the stored Bitbucket credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Authentication routes
//!
//! Login issues no session token. A successful student login hands the
//! stored workspace and access token back to the client, which re-sends them
//! on every proxy call.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{json_body, lenient_string, non_empty};
use crate::constants::{error_messages, messages};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::providers::{RepositoryHost, WorkspaceValidation};
use crate::server::ServerResources;
use crate::utils::auth::{verify_against_dummy, verify_password};
use crate::utils::json_responses::json_response;

/// Login payload shared by students and admins
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    /// Login name
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    /// Plaintext password
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

/// User summary in a student login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUser {
    /// Login name
    pub username: String,
    /// Bitbucket workspace
    pub workspace: String,
}

/// Successful student login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `true`
    pub success: bool,
    /// `Login successful`
    pub message: String,
    /// Stored Bitbucket workspace
    pub workspace: String,
    /// Stored Bitbucket access token
    pub token: String,
    /// User summary
    pub user: LoginUser,
}

/// User summary in an admin login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginUser {
    /// Login name
    pub username: String,
    /// Display name
    pub name: Option<String>,
}

/// Successful admin login
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    /// Always `true`
    pub success: bool,
    /// `Login successful`
    pub message: String,
    /// User summary
    pub user: AdminLoginUser,
}

/// Authentication service for credential checks
pub struct AuthService {
    database: Arc<Database>,
    host: Arc<dyn RepositoryHost>,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Build the service from shared server resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        Self {
            database: resources.database.clone(),
            host: resources.host.clone(),
            bcrypt_cost: resources.config.security.bcrypt_cost,
        }
    }

    fn require_credentials(request: LoginRequest) -> AppResult<(String, String)> {
        match (non_empty(request.username), non_empty(request.password)) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(AppError::missing_fields(error_messages::CREDENTIALS_REQUIRED)),
        }
    }

    fn invalid_credentials(username: &str, event: &str, details: &str) -> AppError {
        AppLogger::log_auth_event(username, event, false, Some(details));
        AppError::auth_invalid(error_messages::INVALID_CREDENTIALS)
    }

    /// Handle student login
    ///
    /// # Errors
    ///
    /// Returns a 400 error for missing credentials, a 401 error for unknown
    /// users, wrong passwords, or rejected workspace credentials, and a 500
    /// error when the upstream cannot be reached
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let (username, password) = Self::require_credentials(request)?;
        tracing::info!("Student login attempt for username: {username}");

        let Some(student) = self.database.get_student_by_username(&username).await? else {
            verify_against_dummy(password, self.bcrypt_cost).await;
            return Err(Self::invalid_credentials(&username, "student_login", "unknown user"));
        };

        if !verify_password(password, student.password.clone()).await? {
            return Err(Self::invalid_credentials(&username, "student_login", "wrong password"));
        }

        match self
            .host
            .validate_workspace(&student.workspace_name, &student.token)
            .await?
        {
            WorkspaceValidation::Valid => {}
            WorkspaceValidation::Rejected { status } => {
                AppLogger::log_auth_event(
                    &username,
                    "student_login",
                    false,
                    Some(&format!("{} rejected workspace credentials", self.host.name())),
                );
                return Err(
                    AppError::external_auth_failed(error_messages::WORKSPACE_VALIDATION_FAILED)
                        .with_details(json!({ "upstreamStatus": status })),
                );
            }
        }

        AppLogger::log_auth_event(&username, "student_login", true, None);
        Ok(LoginResponse {
            success: true,
            message: messages::LOGIN_SUCCESSFUL.to_owned(),
            workspace: student.workspace_name.clone(),
            token: student.token,
            user: LoginUser {
                username: student.username,
                workspace: student.workspace_name,
            },
        })
    }

    /// Handle admin login; no upstream validation is involved
    ///
    /// # Errors
    ///
    /// Returns a 400 error for missing credentials and a 401 error for
    /// unknown admins or wrong passwords
    pub async fn admin_login(&self, request: LoginRequest) -> AppResult<AdminLoginResponse> {
        let (username, password) = Self::require_credentials(request)?;

        let Some(admin) = self.database.get_admin_by_username(&username).await? else {
            verify_against_dummy(password, self.bcrypt_cost).await;
            return Err(Self::invalid_credentials(&username, "admin_login", "unknown user"));
        };

        if !verify_password(password, admin.password.clone()).await? {
            return Err(Self::invalid_credentials(&username, "admin_login", "wrong password"));
        }

        AppLogger::log_auth_event(&username, "admin_login", true, None);
        Ok(AdminLoginResponse {
            success: true,
            message: messages::LOGIN_SUCCESSFUL.to_owned(),
            user: AdminLoginUser {
                username: admin.username,
                name: admin.name,
            },
        })
    }
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/login", post(Self::handle_login))
            .with_state(resources)
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> AppResult<Response> {
        let request = json_body(payload)?;
        let response = AuthService::new(&resources).login(request).await?;

        Ok(json_response(response, StatusCode::OK).into_response())
    }
}
