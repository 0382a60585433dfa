// ABOUTME: Core data models for the Bitbucket dashboard credential store
// ABOUTME: Defines Student and Admin records plus the validated inputs used to create them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! # Data Models
//!
//! Records are serialized in the camelCase shape the dashboard frontend
//! consumes, with the identifier exposed as `_id`.
//!
//! - `Student`: login credentials plus the Bitbucket workspace and access
//!   token used to validate logins
//! - `Admin`: login credentials only

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppResult;

/// Stored student record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Record identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Student-supplied unique identifier, distinct from the username
    pub service_id: String,
    /// Display name
    pub name: String,
    /// Course group
    pub group_number: String,
    /// Unique login name
    pub username: String,
    /// bcrypt hash of the password
    pub password: String,
    /// Bitbucket access token
    pub token: String,
    /// Bitbucket workspace the token belongs to
    pub workspace_name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Validated student signup data with the password already hashed
#[derive(Debug, Clone)]
pub struct NewStudent {
    /// Student-supplied unique identifier
    pub service_id: String,
    /// Display name
    pub name: String,
    /// Course group
    pub group_number: String,
    /// Unique login name
    pub username: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Bitbucket access token
    pub token: String,
    /// Bitbucket workspace
    pub workspace_name: String,
}

impl NewStudent {
    /// Assign an identifier and creation time
    #[must_use]
    pub fn into_record(self) -> Student {
        Student {
            id: Uuid::new_v4(),
            service_id: self.service_id,
            name: self.name,
            group_number: self.group_number,
            username: self.username,
            password: self.password_hash,
            token: self.token,
            workspace_name: self.workspace_name,
            created_at: Utc::now(),
        }
    }
}

/// Stored admin record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// Record identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Unique login name
    pub username: String,
    /// bcrypt hash of the password
    pub password: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Validated admin signup data with the password already hashed
#[derive(Debug, Clone)]
pub struct NewAdmin {
    /// Unique login name
    pub username: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Optional display name
    pub name: Option<String>,
}

impl NewAdmin {
    /// Assign an identifier and creation time
    #[must_use]
    pub fn into_record(self) -> Admin {
        Admin {
            id: Uuid::new_v4(),
            username: self.username,
            password: self.password_hash,
            name: self.name,
            created_at: Utc::now(),
        }
    }
}

/// A stored record whose serialized form may carry credentials
pub trait CredentialRecord: Serialize {
    /// Serialized keys that hold secrets
    const SECRET_FIELDS: &'static [&'static str];

    /// Serialize for a response body, dropping secret keys when `redact` is set
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    fn to_response_value(&self, redact: bool) -> AppResult<Value> {
        let mut value = serde_json::to_value(self)?;
        if redact {
            if let Value::Object(map) = &mut value {
                for field in Self::SECRET_FIELDS {
                    map.remove(*field);
                }
            }
        }
        Ok(value)
    }
}

impl CredentialRecord for Student {
    const SECRET_FIELDS: &'static [&'static str] = &["password", "token"];
}

impl CredentialRecord for Admin {
    const SECRET_FIELDS: &'static [&'static str] = &["password"];
}
