//! retiro-admin - Organizer dashboard service
//!
//! Read-only aggregation over the registrations stored in the tabular
//! store: summary counts, free-text search, and CSV export.

use anyhow::Result;
use clap::Parser;
use retiro_admin::{build_router, AppState};
use retiro_common::EventConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "retiro-admin", about = "Retiro organizer dashboard")]
struct Args {
    /// Path to the event config file (overrides RETIRO_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification logged immediately for instant startup feedback
    info!(
        "Starting Retiro Dashboard (retiro-admin) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = EventConfig::load(args.config.as_deref())?;

    if config.sheet_url.is_empty() {
        info!("Sheet URL not configured; data routes will report a sync error");
    }
    if config.admin_passphrase.is_empty() {
        info!("Dashboard gate disabled (no passphrase configured)");
    }

    let port = config.admin_port;
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("retiro-admin listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
