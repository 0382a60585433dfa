// ABOUTME: Admin record database operations
// ABOUTME: Handles admin creation, lookup by username, listing, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{map_unique_violation, parse_id, Database};
use crate::constants::error_messages;
use crate::errors::AppResult;
use crate::models::{Admin, NewAdmin};

impl Database {
    /// Create the admins table
    pub(super) async fn migrate_admins(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS admins (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                name TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist a new admin
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the username is taken, or a database error
    /// if the insert fails
    pub async fn create_admin(&self, new_admin: NewAdmin) -> AppResult<Admin> {
        let admin = new_admin.into_record();

        sqlx::query(
            r"
            INSERT INTO admins (id, username, password_hash, name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(admin.id.to_string())
        .bind(&admin.username)
        .bind(&admin.password)
        .bind(&admin.name)
        .bind(admin.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                &[("admins.username", "username", error_messages::USERNAME_EXISTS)],
            )
        })?;

        Ok(admin)
    }

    /// Find an admin by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_admin_by_username(&self, username: &str) -> AppResult<Option<Admin>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, name, created_at FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_admin).transpose()
    }

    /// All admins in creation order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_admins(&self) -> AppResult<Vec<Admin>> {
        let rows = sqlx::query(
            "SELECT id, username, password_hash, name, created_at FROM admins ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_admin).collect()
    }

    /// Remove an admin, returning the deleted record
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_admin(&self, id: Uuid) -> AppResult<Option<Admin>> {
        let row = sqlx::query(
            "DELETE FROM admins WHERE id = $1 RETURNING id, username, password_hash, name, created_at",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_admin).transpose()
    }

    fn row_to_admin(row: &SqliteRow) -> AppResult<Admin> {
        let id: String = row.try_get("id")?;

        Ok(Admin {
            id: parse_id(&id)?,
            username: row.try_get("username")?,
            password: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
