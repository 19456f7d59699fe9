//! # Solar MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to Upstage Solar.
//!
//! Reads configuration from flags or environment variables:
//! - `UPSTAGE_API_KEY` — API key (required)
//! - `UPSTAGE_API_URL` — API base URL (default: `https://api.upstage.ai/v1`)
//! - `UPSTAGE_DEFAULT_MODEL` — default model (default: `solar-pro2`)
//! - `SOLAR_LOG_FORMAT` — `text` or `json`
//!
//! Communicates with AI clients (Claude, GPT) via MCP over stdio,
//! and forwards chat requests to the Solar HTTP API.

use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use solar_core::UsageTracker;
use solar_mcp::{ChatExecutor, Cli, Config, LogFormat, SolarClient, SolarMcp};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = Config::from_cli(&cli).inspect_err(|e| {
        tracing::error!("{}", e);
    })?;

    let client = SolarClient::new(config.api_key, config.api_url);
    let tracker = Arc::new(UsageTracker::new());
    let executor = ChatExecutor::new(client, tracker, config.default_model);

    tracing::info!(
        "Solar MCP server starting, target: {}, default model: {}",
        executor.client().base_url(),
        executor.default_model()
    );
    let mcp = SolarMcp::new(executor);

    let service = mcp.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP serve error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}

/// Logging goes to stderr only — stdout is reserved for the MCP stdio transport.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "solar_mcp=info".into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(false),
                )
                .init();
        }
    }
}
