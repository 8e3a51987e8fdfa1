//! K-line alert webhook receiver

use std::sync::Arc;
use tracing::{info, warn};

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration before tracing so LOG_FORMAT can pick the formatter
    let config = common::Config::from_env()?;

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("receiver=debug".parse()?)
        .add_directive("webhook=debug".parse()?);
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("📨 Starting K-line webhook receiver ({} mode)", config.mode);
    if config.mode == common::VerificationMode::Diagnostic {
        warn!("Diagnostic mode: deliveries with bad signatures will be accepted");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = routes::router(state);

    info!("🚀 Listening on http://{}", addr);
    info!("Use this URL as the webhookUrl of your alert subscription");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
