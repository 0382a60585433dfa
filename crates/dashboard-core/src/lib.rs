// ABOUTME: Core types for the Bitbucket dashboard backend
// ABOUTME: Foundation crate with the unified error system and HTTP error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

#![deny(unsafe_code)]

//! # Dashboard Core
//!
//! Foundation crate providing shared error types for the Bitbucket dashboard
//! backend. It changes rarely, so keeping it separate from the server crate
//! keeps incremental builds of the route layer fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and the
//!   JSON error envelope returned by every route

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;
