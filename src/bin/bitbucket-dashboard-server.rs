// ABOUTME: Server binary for the Bitbucket dashboard backend
// ABOUTME: Loads configuration, opens the credential store, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bitbucket Dashboard Contributors

//! # Bitbucket Dashboard Server Binary
//!
//! Starts the student/admin credential API and the Bitbucket proxy.

use std::sync::Arc;

use anyhow::Result;
use bitbucket_dashboard::{
    config::ServerConfig,
    database::Database,
    errors::set_error_trace_enabled,
    logging, providers,
    server::{DashboardServer, ServerResources},
};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "bitbucket-dashboard-server")]
#[command(about = "Bitbucket Dashboard Backend - credential store and Bitbucket API proxy")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = bitbucket_dashboard::config::DatabaseUrl::parse_url(&database_url)?;
    }

    set_error_trace_enabled(config.environment.is_development());
    info!("{}", config.summary());

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    let host = providers::create_host(&config.bitbucket)?;
    info!("Repository host ready: {}", host.name());

    let resources = Arc::new(ServerResources::new(database, host, config));
    let server = DashboardServer::new(resources);

    if let Err(e) = server.run().await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
