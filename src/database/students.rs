// ABOUTME: Student record database operations
// ABOUTME: Handles student creation, uniqueness lookups, listing, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

use std::time::Instant;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{map_unique_violation, parse_id, Database};
use crate::constants::error_messages;
use crate::errors::AppResult;
use crate::logging::AppLogger;
use crate::models::{NewStudent, Student};

const STUDENT_COLUMNS: &str = "id, service_id, name, group_number, username, password_hash, \
                               token, workspace_name, created_at";

impl Database {
    /// Create the students table
    pub(super) async fn migrate_students(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                service_id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                group_number TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                token TEXT NOT NULL,
                workspace_name TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist a new student
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the username or service ID is taken, or a
    /// database error if the insert fails
    pub async fn create_student(&self, new_student: NewStudent) -> AppResult<Student> {
        let started = Instant::now();
        let student = new_student.into_record();

        let result = sqlx::query(
            r"
            INSERT INTO students (id, service_id, name, group_number, username,
                                  password_hash, token, workspace_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(student.id.to_string())
        .bind(&student.service_id)
        .bind(&student.name)
        .bind(&student.group_number)
        .bind(&student.username)
        .bind(&student.password)
        .bind(&student.token)
        .bind(&student.workspace_name)
        .bind(student.created_at)
        .execute(&self.pool)
        .await;

        AppLogger::log_database_operation(
            "insert",
            "students",
            result.is_ok(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        result.map_err(|e| {
            map_unique_violation(
                e,
                &[
                    ("students.username", "username", error_messages::USERNAME_EXISTS),
                    ("students.service_id", "serviceId", error_messages::SERVICE_ID_EXISTS),
                ],
            )
        })?;

        Ok(student)
    }

    /// Find a student by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_student_by_username(&self, username: &str) -> AppResult<Option<Student>> {
        self.get_student_impl("username", username).await
    }

    /// Find a student by service ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_student_by_service_id(&self, service_id: &str) -> AppResult<Option<Student>> {
        self.get_student_impl("service_id", service_id).await
    }

    async fn get_student_impl(&self, field: &str, value: &str) -> AppResult<Option<Student>> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE {field} = $1");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_student).transpose()
    }

    /// All students in creation order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_students(&self) -> AppResult<Vec<Student>> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY rowid");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_student).collect()
    }

    /// Remove a student, returning the deleted record
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_student(&self, id: Uuid) -> AppResult<Option<Student>> {
        let query = format!("DELETE FROM students WHERE id = $1 RETURNING {STUDENT_COLUMNS}");

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_student).transpose()
    }

    fn row_to_student(row: &SqliteRow) -> AppResult<Student> {
        let id: String = row.try_get("id")?;

        Ok(Student {
            id: parse_id(&id)?,
            service_id: row.try_get("service_id")?,
            name: row.try_get("name")?,
            group_number: row.try_get("group_number")?,
            username: row.try_get("username")?,
            password: row.try_get("password_hash")?,
            token: row.try_get("token")?,
            workspace_name: row.try_get("workspace_name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
