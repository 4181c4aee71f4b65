//! # spotter-cli: A CLI for `spotter`
//!
//! Uploads an image to a running `spotter-server`, asks it to look for items,
//! and prints the categorized result.

mod presenter;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use presenter::TerminalPresenter;
use spotter::{
    constants::{DEFAULT_FOUND_LOW, DEFAULT_MAYBE_LOW, DEFAULT_MODEL},
    transport::ModelDirectory,
    AnalysisSession, HttpAnalysisClient, ThresholdConfig,
};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the spotter server
    #[arg(
        long,
        global = true,
        env = "SPOTTER_SERVER_URL",
        default_value = "http://localhost:5000"
    )]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the models the server can analyze with
    Models,
    /// Upload an image and analyze it
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Path of the image to upload
    #[arg(long)]
    image: PathBuf,
    /// Model to use; defaults to the first model the server lists
    #[arg(long)]
    model: Option<String>,
    /// Comma-separated items to look for; empty lets the model choose
    #[arg(long, default_value = "")]
    items: String,
    /// Lowest confidence counted as found
    #[arg(long, default_value = DEFAULT_FOUND_LOW)]
    found_low: String,
    /// Lowest confidence counted as maybe found
    #[arg(long, default_value = DEFAULT_MAYBE_LOW)]
    maybe_low: String,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Log to a file so terminal output stays readable.
    let log_file = File::create("spotter-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let client = HttpAnalysisClient::new(cli.server.as_str())?;
    info!("Using server at {}", client.base_url());

    match &cli.command {
        Commands::Models => handle_models(&client).await,
        Commands::Analyze(args) => handle_analyze(&client, args).await,
    }
}

// --- Command Handlers ---

async fn handle_models(client: &HttpAnalysisClient) -> Result<ExitCode> {
    match client.list_models().await {
        Ok(response) => {
            if let Some(warning) = &response.warning {
                eprintln!("Warning: {warning}");
            }
            for model in &response.models {
                println!("{model}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error fetching models: {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Picks the first listed model, or the default one if the server has none to offer.
async fn resolve_model(client: &HttpAnalysisClient, requested: Option<&str>) -> String {
    if let Some(model) = requested.filter(|m| !m.trim().is_empty()) {
        return model.to_string();
    }
    match client.list_models().await {
        Ok(response) => response
            .models
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        Err(e) => {
            warn!("Could not list models, using {}: {}", DEFAULT_MODEL, e);
            DEFAULT_MODEL.to_string()
        }
    }
}

async fn handle_analyze(client: &HttpAnalysisClient, args: &AnalyzeArgs) -> Result<ExitCode> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read image '{}'", args.image.display()))?;
    let file_name = args
        .image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = AnalysisSession::new(TerminalPresenter::new(std::io::stdout()));

    println!("Uploading {}...", args.image.display());
    match session.upload(client, &file_name, bytes).await {
        Ok(reference) => println!("Image uploaded successfully: {reference}"),
        Err(e) => {
            eprintln!("Upload failed: {}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    }

    let model = resolve_model(client, args.model.as_deref()).await;
    let thresholds = ThresholdConfig::parse_lenient(&args.found_low, &args.maybe_low);
    for problem in thresholds.validate() {
        eprintln!("Warning: {problem}");
    }

    info!(%model, items = %args.items, "Starting analysis");
    match session
        .analyze(client, &model, &args.items, thresholds)
        .await
    {
        Ok(_) => Ok(ExitCode::SUCCESS),
        // The presenter has already shown the message.
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
