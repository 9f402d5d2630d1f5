//! loaner HTTP server
//!
//! Serves loan plan creation over HTTP.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use loan_plan_rs::api;
use loan_plan_rs::config::ServerConfig;

/// Annuity loan plan service
#[derive(Parser, Debug)]
#[command(name = "loaner", version, about)]
struct Cli {
    /// Host to bind to
    #[arg(long, env = "LOANER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "LOANER_PORT")]
    port: Option<u16>,

    /// Tracing filter directives (RUST_LOG takes precedence)
    #[arg(long, env = "LOANER_LOG")]
    log_filter: Option<String>,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            log_filter: self.log_filter.unwrap_or(defaults.log_filter),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = config
        .socket_addr()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(version = env!("CARGO_PKG_VERSION"), %addr, "loaner listening");

    axum::serve(listener, api::default_router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("loaner stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
