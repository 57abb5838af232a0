use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use greenroom_logging::Logger;
use greenroom_oracle::{Oracle, OracleConfig};
use greenroom_reports::ReportStore;

use crate::api;

pub async fn run(
    port: u16,
    oracle: Box<dyn Oracle>,
    oracle_config: OracleConfig,
    store: ReportStore,
    logger: Logger,
) -> Result<()> {
    let router = api::create_router(
        Arc::from(oracle),
        oracle_config,
        Arc::new(store),
        Arc::new(logger),
    );

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;

    eprintln!();
    eprintln!(
        "  {} {}",
        "->".bright_green(),
        format!("API listening on http://localhost:{}", port).bold()
    );
    eprintln!("  {} Press {} to stop", "->".dimmed(), "Ctrl+C".bold());
    eprintln!();

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    eprintln!("\nShutting down...");
}
