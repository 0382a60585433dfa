// ABOUTME: Student management route handlers for signup, listing, and deletion
// ABOUTME: Validates signup fields, enforces unique username/service ID, and hashes passwords
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Student management routes
//!
//! Signup reports every missing field at once in the `errors` map, then
//! checks uniqueness (username first, then service ID) before hashing.

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

use super::{json_body, lenient_string, non_empty};
use crate::constants::{error_messages, messages};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{CredentialRecord, NewStudent, Student};
use crate::server::ServerResources;
use crate::utils::auth::hash_password;
use crate::utils::json_responses::{
    detailed_success, json_response, message_only, success_with_data,
};

/// Student signup payload; every field is required
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSignupRequest {
    /// Student-supplied unique identifier
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_id: Option<String>,
    /// Display name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Course group
    #[serde(default, deserialize_with = "lenient_string")]
    pub group_number: Option<String>,
    /// Login name
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    /// Plaintext password
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
    /// Bitbucket access token
    #[serde(default, deserialize_with = "lenient_string")]
    pub token: Option<String>,
    /// Bitbucket workspace
    #[serde(default, deserialize_with = "lenient_string")]
    pub workspace_name: Option<String>,
}

/// Signup fields after the presence check
struct ValidatedSignup {
    service_id: String,
    name: String,
    group_number: String,
    username: String,
    password: String,
    token: String,
    workspace_name: String,
}

impl StudentSignupRequest {
    /// Collect every missing field into one validation error
    fn validate(self) -> AppResult<ValidatedSignup> {
        let mut error = AppError::missing_fields(error_messages::REQUIRED_FIELDS_MISSING);
        let mut take = |value: Option<String>, field: &str, message: &str| {
            let value = non_empty(value);
            if value.is_none() {
                error.context.field_errors.insert(field.to_owned(), message.to_owned());
            }
            value.unwrap_or_default()
        };

        let validated = ValidatedSignup {
            service_id: take(self.service_id, "serviceId", "Service ID is required"),
            name: take(self.name, "name", "Name is required"),
            group_number: take(self.group_number, "groupNumber", "Group number is required"),
            username: take(self.username, "username", "Username is required"),
            password: take(self.password, "password", "Password is required"),
            token: take(self.token, "token", "Token is required"),
            workspace_name: take(
                self.workspace_name,
                "workspaceName",
                "Workspace name is required",
            ),
        };

        if error.context.field_errors.is_empty() {
            Ok(validated)
        } else {
            Err(error)
        }
    }
}

/// Student record operations behind the HTTP handlers
pub struct StudentService {
    database: Arc<Database>,
    bcrypt_cost: u32,
    redact_credentials: bool,
}

impl StudentService {
    /// Build the service from shared server resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        Self {
            database: resources.database.clone(),
            bcrypt_cost: resources.config.security.bcrypt_cost,
            redact_credentials: resources.config.security.redact_credentials,
        }
    }

    /// Validate, check uniqueness, hash the password, and persist
    ///
    /// # Errors
    ///
    /// Returns a validation error listing missing fields, a conflict error on
    /// a taken username or service ID, or an internal/database error
    pub async fn create_student(&self, request: StudentSignupRequest) -> AppResult<Student> {
        let signup = request.validate()?;

        if self
            .database
            .get_student_by_username(&signup.username)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists(
                "username",
                error_messages::USERNAME_EXISTS,
            ));
        }

        if self
            .database
            .get_student_by_service_id(&signup.service_id)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists(
                "serviceId",
                error_messages::SERVICE_ID_EXISTS,
            ));
        }

        let password_hash = hash_password(signup.password, self.bcrypt_cost).await?;

        let student = self
            .database
            .create_student(NewStudent {
                service_id: signup.service_id,
                name: signup.name,
                group_number: signup.group_number,
                username: signup.username,
                password_hash,
                token: signup.token,
                workspace_name: signup.workspace_name,
            })
            .await?;

        AppLogger::log_auth_event(&student.username, "student_signup", true, None);
        Ok(student)
    }

    /// Every student as response values, redacted when configured
    ///
    /// # Errors
    ///
    /// Returns an error if the query or serialization fails
    pub async fn list_students(&self) -> AppResult<Vec<Value>> {
        self.database
            .list_students()
            .await?
            .iter()
            .map(|student| student.to_response_value(self.redact_credentials))
            .collect()
    }

    /// Delete a student by identifier, returning the removed record
    ///
    /// Identifiers that are not valid UUIDs cannot match a record and are
    /// reported as not found.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no record matches
    pub async fn delete_student(&self, id: &str) -> AppResult<Value> {
        let not_found = || AppError::not_found("Student").with_resource_id(id);

        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;
        let student = self
            .database
            .delete_student(uuid)
            .await?
            .ok_or_else(not_found)?;

        student.to_response_value(self.redact_credentials)
    }
}

/// Student routes
pub struct StudentRoutes;

impl StudentRoutes {
    /// Create all student routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/students", get(Self::handle_list))
            .route("/api/students/signup", post(Self::handle_signup))
            .route("/api/students/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<StudentSignupRequest>, JsonRejection>,
    ) -> AppResult<Response> {
        let request = json_body(payload)?;
        StudentService::new(&resources).create_student(request).await?;

        Ok(json_response(message_only(messages::STUDENT_REGISTERED), StatusCode::CREATED)
            .into_response())
    }

    async fn handle_list(State(resources): State<Arc<ServerResources>>) -> AppResult<Response> {
        let students = StudentService::new(&resources).list_students().await?;

        Ok(json_response(success_with_data(Value::Array(students)), StatusCode::OK).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> AppResult<Response> {
        let student = StudentService::new(&resources).delete_student(&id).await?;

        Ok(json_response(
            detailed_success(messages::STUDENT_DELETED, student),
            StatusCode::OK,
        )
        .into_response())
    }
}
