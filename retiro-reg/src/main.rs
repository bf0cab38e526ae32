//! retiro-reg - Registration service
//!
//! Serves the multi-step registration form API: session state machine,
//! submission pipeline (guidance + sheet mirror + messaging handoff),
//! and the success-view auto-redirect.

use anyhow::Result;
use clap::Parser;
use retiro_common::EventConfig;
use retiro_reg::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "retiro-reg", about = "Retiro registration service")]
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
        "Starting Retiro Registration (retiro-reg) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = EventConfig::load(args.config.as_deref())?;

    info!(
        "Event: {} — {} configured days, sheet mirror {}",
        config.event.title,
        config.days.len(),
        if config.sheet_url.is_empty() { "disabled" } else { "enabled" }
    );

    let port = config.reg_port;
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("retiro-reg listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
