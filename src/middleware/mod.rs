// ABOUTME: HTTP middleware for request tracing, CORS, and panic recovery
// ABOUTME: Provides request ID generation, span creation, and the cross-origin policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

/// Cross-origin resource sharing policy
pub mod cors;
/// Request ids, request spans, and panic recovery
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing and context management
pub use tracing::{create_request_span, handle_panic, request_id_layers, REQUEST_ID_HEADER};
