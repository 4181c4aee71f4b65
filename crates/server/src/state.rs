//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the configuration, the
//! inference service client and the upload store, making them accessible to
//! all request handlers.

use crate::{config::AppConfig, uploads::UploadStore};
use spotter::providers::ai::{ollama::OllamaProvider, VisionProvider};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The inference service used for `/analyze` and `/models`.
    pub vision_provider: Arc<dyn VisionProvider>,
    /// Where uploaded images are validated and stored.
    pub uploads: UploadStore,
}

/// Builds the shared application state from the configuration.
///
/// Instantiates the Ollama client and makes sure the upload directory exists.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let provider = OllamaProvider::new(
        config.ollama.generate_url.clone(),
        config.ollama.tags_url.clone(),
        Duration::from_secs(config.ollama.list_timeout_secs),
    )?;
    info!(
        generate_url = %config.ollama.generate_url,
        tags_url = %config.ollama.tags_url,
        "Initialized Ollama provider."
    );

    build_app_state_with_provider(config, Arc::new(provider)).await
}

/// Builds the state around an already constructed provider.
pub async fn build_app_state_with_provider(
    config: AppConfig,
    vision_provider: Arc<dyn VisionProvider>,
) -> anyhow::Result<AppState> {
    let uploads = UploadStore::open(&config.upload_dir, config.allowed_extensions.clone()).await?;

    Ok(AppState {
        config: Arc::new(config),
        vision_provider,
        uploads,
    })
}
