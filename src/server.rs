// ABOUTME: Server assembly: shared resources, the full router, and the HTTP serve loop
// ABOUTME: Wires route groups with tracing, CORS, request ids, and panic recovery layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! # Dashboard Server
//!
//! [`ServerResources`] is built once at startup and handed to every route
//! group. [`DashboardServer`] binds the listener, serves until a shutdown
//! signal arrives, then closes the credential store.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::{create_request_span, handle_panic, request_id_layers, setup_cors};
use crate::providers::RepositoryHost;
use crate::routes::{
    handle_not_found, AdminRoutes, AuthRoutes, HealthRoutes, ProxyRoutes, StudentRoutes,
};

/// Shared state injected into every route group
pub struct ServerResources {
    /// Credential store
    pub database: Arc<Database>,
    /// Upstream repository host
    pub host: Arc<dyn RepositoryHost>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(database: Database, host: Arc<dyn RepositoryHost>, config: ServerConfig) -> Self {
        Self {
            database: Arc::new(database),
            host,
            config: Arc::new(config),
        }
    }
}

/// Build the complete application router
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let routes = Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(ProxyRoutes::routes(resources.clone()))
        .merge(StudentRoutes::routes(resources.clone()))
        .merge(AdminRoutes::routes(resources.clone()))
        .fallback(handle_not_found);

    with_middleware(routes, &resources.config)
}

/// Wrap routes in panic recovery, `CORS`, request ids, and request tracing
#[must_use]
pub fn with_middleware(routes: Router, config: &ServerConfig) -> Router {
    let (set_request_id, propagate_request_id) = request_id_layers();

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(setup_cors(config))
        .layer(propagate_request_id)
        .layer(TraceLayer::new_for_http().make_span_with(create_request_span))
        .layer(set_request_id)
}

/// HTTP server for the dashboard backend
pub struct DashboardServer {
    resources: Arc<ServerResources>,
}

impl DashboardServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// The router this server serves
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(&self.resources)
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails
    pub async fn run(self) -> Result<()> {
        let address = format!(
            "{}:{}",
            self.resources.config.host, self.resources.config.http_port
        );
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = listener.local_addr()?;
        info!("Bitbucket dashboard backend listening on http://{address}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")?;

        self.resources.database.close().await;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
