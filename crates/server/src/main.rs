//! Family Assist server
//!
//! Main entry point. Loads configuration and reference data, then serves
//! `POST /ask` until interrupted.

use anyhow::Context;
use clap::Parser;
use family_assist::{create_app, AppState};
use family_assist_core::config::{AppConfig, ConfigOverrides};
use family_assist_core::logging;
use family_assist_knowledge::ReferenceData;
use family_assist_llm::{create_client, ClientSettings};
use std::path::PathBuf;
use std::sync::Arc;

/// Family Assist - answers family resource questions from local provider data
#[derive(Parser, Debug)]
#[command(name = "family-assist")]
#[command(about = "Answers family resource questions from local provider data", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, env = "FAMILY_ASSIST_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Provider dataset (JSON or YAML)
    #[arg(long)]
    providers: Option<PathBuf>,

    /// Knowledge block dataset (JSON or YAML)
    #[arg(long)]
    knowledge: Option<PathBuf>,

    /// LLM provider (openai, ollama)
    #[arg(short, long)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Defaults, config file and environment, then CLI flags on top
    let config = AppConfig::load(cli.config)?.with_overrides(ConfigOverrides {
        host: cli.host,
        port: cli.port,
        providers_path: cli.providers,
        knowledge_path: cli.knowledge,
        provider: cli.provider,
        model: cli.model,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Family Assist starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;

    let data = ReferenceData::load(&config.providers_path, &config.knowledge_path)
        .context("Failed to load reference data")?;

    let client = create_client(&ClientSettings::from_config(&config))?;
    let state = AppState::new(data, client, config.model.clone())?;
    let app = create_app(Arc::new(state));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    tracing::info!("AI backend running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Family Assist shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
