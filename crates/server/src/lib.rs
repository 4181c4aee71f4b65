pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;
pub mod uploads;

use crate::{
    config::{get_config, AppConfig},
    router::create_router,
    state::build_app_state,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

/// Serves spotter on `listener`.
///
/// Creates the upload directory if needed and connects the Ollama provider
/// at the configured URLs before accepting requests.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    debug!(?config, "Server configuration loaded");

    let app_state = build_app_state(config).await?;
    let app = create_router(app_state);

    info!("Accepting uploads and analysis requests on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Entry point of the `server` binary.
///
/// Reads `.env`, installs the `RUST_LOG` filtered subscriber, loads
/// `config.yml` plus environment overrides, and binds `0.0.0.0:<port>`.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config(None)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(upload_dir = %config.upload_dir, ollama = %config.ollama.generate_url, "Starting spotter server on {}", addr);

    run(listener, config).await
}
