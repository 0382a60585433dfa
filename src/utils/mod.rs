// ABOUTME: Utility modules for common functionality across the application
// ABOUTME: Contains shared helpers for credentials, HTTP clients, and JSON responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

/// Bearer token extraction and bcrypt password helpers
pub mod auth;
/// HTTP client configuration and helpers
pub mod http_client;
/// JSON response formatting utilities
pub mod json_responses;
