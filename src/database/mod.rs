// ABOUTME: Credential store for student and admin records backed by SQLite through sqlx
// ABOUTME: Constructed once at startup, migrated on creation, shared as Arc<Database>
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! # Database Management
//!
//! [`Database`] owns the connection pool. Record operations live in the
//! `students` and `admins` submodules as further `impl Database` blocks.

mod admins;
mod students;

use std::fs;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Database manager for student and admin records
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the credential store and run migrations
    ///
    /// In-memory databases use a single pooled connection that is never
    /// recycled, so every request sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is unsupported, the parent
    /// directory cannot be created, the connection fails, or migrations fail
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let parsed = DatabaseUrl::parse_url(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?;

        if let DatabaseUrl::SQLite { path } = &parsed {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::config(format!(
                        "Cannot create database directory {}",
                        parent.display()
                    ))
                    .with_source(e)
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&parsed.to_connection_string())?
            .create_if_missing(true);

        let pool = if parsed.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let db = Self { pool };
        db.migrate().await?;

        info!(database = %parsed, "Credential store ready");
        Ok(db)
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_students().await?;
        self.migrate_admins().await?;
        Ok(())
    }

    /// Round-trip a trivial query to confirm the store is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is closed or the query fails
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Credential store closed");
    }
}

/// Map a `UNIQUE` constraint violation on `column` to a conflict error
///
/// `fields` pairs a column name with the request field and message to report.
fn map_unique_violation(error: sqlx::Error, fields: &[(&str, &str, &str)]) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            let message = db_error.message();
            if let Some((_, field, text)) = fields
                .iter()
                .find(|(column, _, _)| message.contains(column))
            {
                return AppError::already_exists(*field, *text);
            }
        }
    }
    AppError::from(error)
}

/// Decode a stored identifier
fn parse_id(raw: &str) -> AppResult<uuid::Uuid> {
    uuid::Uuid::parse_str(raw)
        .map_err(|e| AppError::database(format!("Corrupt record identifier: {raw}")).with_source(e))
}
