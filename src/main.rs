//! DocQueue API Server
//!
//! Run with: cargo run --bin docqueue
//!
//! # Configuration
//!
//! Reads `--config <path>`, `~/.config/docqueue/config.toml` or
//! `./docqueue.toml`, then applies environment overrides:
//! - `DOCQUEUE_DATA_DIR`: Data directory
//! - `DOCQUEUE_API_HOST` / `DOCQUEUE_API_PORT`: Bind address
//! - `GEMINI_API_KEY`: Enables the AI assistant
//! - `DOCQUEUE_LOG_LEVEL` / `DOCQUEUE_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter directive, wins over the level

use anyhow::Context;
use clap::Parser;
use docqueue::api::{serve, AppState};
use docqueue::assistant::MedicalAssistant;
use docqueue::clinic::ClinicStore;
use docqueue::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docqueue")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "DocQueue API server")]
struct Args {
    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_default(args.config.as_deref())?;

    docqueue::logging::init_tracing(&config.logging)?;

    tracing::info!("Starting DocQueue API server v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.storage.data_path();
    tracing::info!("Data directory: {:?}", data_dir);

    let clinic = ClinicStore::open_dir(&data_dir)
        .with_context(|| format!("Failed to open data directory {:?}", data_dir))?;
    tracing::info!("Clinic store loaded: {}", clinic.stats());

    if config.assistant.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; the assistant will answer with the fallback message");
    }
    let assistant = MedicalAssistant::gemini(config.assistant.gemini());
    tracing::info!("Assistant model: {}", assistant.model());

    let state = AppState::new(clinic, assistant, config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("DocQueue API server stopped");
    Ok(())
}
