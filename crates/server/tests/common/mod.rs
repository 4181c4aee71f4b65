//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `spotter-server`
//! integration tests.
//!
//! - `TestApp`: spawns the real server on a random port. Ollama is either an
//!   `httpmock::MockServer` (via `spawn`) or a `MockVisionProvider` (via
//!   `spawn_with_provider`). Uploads land in a temporary directory.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use reqwest::{multipart, Client};
use spotter_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, build_app_state_with_provider, AppState},
};
use spotter_test_utils::MockVisionProvider;
use std::{
    fs::File,
    io::Write,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub upload_dir: PathBuf,
    pub app_state: AppState,
    _data_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with the real Ollama client pointed at a mock server.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let data_dir = tempdir()?;
        let upload_dir = data_dir.path().join("uploads");

        let config_path = data_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
upload_dir: "{}"
max_upload_bytes: 1024
ollama:
  generate_url: "{}"
  tags_url: "{}"
  list_timeout_secs: 1
  default_model: "llava:latest"
  fallback_models: ["llava:latest"]
"#,
            upload_dir.to_str().unwrap(),
            mock_server.url("/api/generate"),
            mock_server.url("/api/tags"),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;

        Self::spawn_with_state(app_state, mock_server, upload_dir, data_dir).await
    }

    /// Spawns the server around a `MockVisionProvider`.
    pub async fn spawn_with_provider(provider: MockVisionProvider) -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let data_dir = tempdir()?;
        let upload_dir = data_dir.path().join("uploads");

        let config = AppConfig {
            upload_dir: upload_dir.to_str().unwrap().to_string(),
            ..AppConfig::default()
        };
        let app_state = build_app_state_with_provider(config, Arc::new(provider)).await?;

        Self::spawn_with_state(app_state, mock_server, upload_dir, data_dir).await
    }

    async fn spawn_with_state(
        app_state: AppState,
        mock_server: MockServer,
        upload_dir: PathBuf,
        data_dir: TempDir,
    ) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            upload_dir,
            app_state: app_state_for_harness,
            _data_dir: data_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Posts `bytes` as the multipart `file` field of `/upload`.
    pub async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<reqwest::Response> {
        let part = multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .percent_encode_noop()
            .part("file", part);
        Ok(self
            .client
            .post(format!("{}/upload", self.address))
            .multipart(form)
            .send()
            .await?)
    }

    /// Writes an image straight into the upload directory and returns its path.
    pub fn stored_image(&self, file_name: &str, bytes: &[u8]) -> String {
        let path = self.upload_dir.join(file_name);
        std::fs::write(&path, bytes).unwrap();
        path.to_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
