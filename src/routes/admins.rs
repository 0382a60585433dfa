// ABOUTME: Admin management route handlers for signup, login, listing, and deletion
// ABOUTME: Mirrors the student routes for admin records, with login that needs no upstream call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::auth::{AuthService, LoginRequest};
use super::{json_body, lenient_string, non_empty};
use crate::constants::{error_messages, messages};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{Admin, CredentialRecord, NewAdmin};
use crate::server::ServerResources;
use crate::utils::auth::hash_password;
use crate::utils::json_responses::{
    detailed_success, json_response, message_only, success_with_data,
};

/// Admin signup payload
#[derive(Debug, Default, Deserialize)]
pub struct AdminSignupRequest {
    /// Login name (required)
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    /// Plaintext password (required)
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
    /// Display name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Admin record operations behind the HTTP handlers
pub struct AdminService {
    database: Arc<Database>,
    bcrypt_cost: u32,
    redact_credentials: bool,
}

impl AdminService {
    /// Build the service from shared server resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        Self {
            database: resources.database.clone(),
            bcrypt_cost: resources.config.security.bcrypt_cost,
            redact_credentials: resources.config.security.redact_credentials,
        }
    }

    /// Validate, check the username, hash the password, and persist
    ///
    /// # Errors
    ///
    /// Returns a validation error listing missing fields, a conflict error on
    /// a taken username, or an internal/database error
    pub async fn create_admin(&self, request: AdminSignupRequest) -> AppResult<Admin> {
        let username = non_empty(request.username);
        let password = non_empty(request.password);

        let (Some(username), Some(password)) = (username.clone(), password.clone()) else {
            let mut error = AppError::missing_fields(error_messages::REQUIRED_FIELDS_MISSING);
            if username.is_none() {
                error = error.with_field_error("username", "Username is required");
            }
            if password.is_none() {
                error = error.with_field_error("password", "Password is required");
            }
            return Err(error);
        };

        if self.database.get_admin_by_username(&username).await?.is_some() {
            return Err(AppError::already_exists(
                "username",
                error_messages::USERNAME_EXISTS,
            ));
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let admin = self
            .database
            .create_admin(NewAdmin {
                username,
                password_hash,
                name: non_empty(request.name),
            })
            .await?;

        AppLogger::log_auth_event(&admin.username, "admin_signup", true, None);
        Ok(admin)
    }

    /// Every admin as response values, redacted when configured
    ///
    /// # Errors
    ///
    /// Returns an error if the query or serialization fails
    pub async fn list_admins(&self) -> AppResult<Vec<Value>> {
        self.database
            .list_admins()
            .await?
            .iter()
            .map(|admin| admin.to_response_value(self.redact_credentials))
            .collect()
    }

    /// Delete an admin by identifier, returning the removed record
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no record matches
    pub async fn delete_admin(&self, id: &str) -> AppResult<Value> {
        let not_found = || AppError::not_found("Admin").with_resource_id(id);

        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;
        let admin = self
            .database
            .delete_admin(uuid)
            .await?
            .ok_or_else(not_found)?;

        admin.to_response_value(self.redact_credentials)
    }
}

/// Admin routes
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/admin", get(Self::handle_list))
            .route("/api/admin/signup", post(Self::handle_signup))
            .route("/api/admin/login", post(Self::handle_login))
            .route("/api/admin/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<AdminSignupRequest>, JsonRejection>,
    ) -> AppResult<Response> {
        let request = json_body(payload)?;
        AdminService::new(&resources).create_admin(request).await?;

        Ok(json_response(message_only(messages::ADMIN_REGISTERED), StatusCode::CREATED)
            .into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> AppResult<Response> {
        let request = json_body(payload)?;
        let response = AuthService::new(&resources).admin_login(request).await?;

        Ok(json_response(response, StatusCode::OK).into_response())
    }

    async fn handle_list(State(resources): State<Arc<ServerResources>>) -> AppResult<Response> {
        let admins = AdminService::new(&resources).list_admins().await?;

        Ok(json_response(success_with_data(Value::Array(admins)), StatusCode::OK).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> AppResult<Response> {
        let admin = AdminService::new(&resources).delete_admin(&id).await?;

        Ok(json_response(detailed_success(messages::ADMIN_DELETED, admin), StatusCode::OK)
            .into_response())
    }
}
