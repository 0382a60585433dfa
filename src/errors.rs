// ABOUTME: Re-exports the unified error system from dashboard-core
// ABOUTME: Lets route and service code import crate::errors without naming the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! Error types shared by every layer of the server.
//!
//! The types live in `dashboard-core`; `IntoResponse` for [`AppError`] is
//! enabled through its `http-response` feature.

pub use dashboard_core::errors::{
    error_trace_enabled, set_error_trace_enabled, AppError, AppResult, ErrorCode, ErrorContext,
    ErrorResponse, ErrorResponseDetails,
};
