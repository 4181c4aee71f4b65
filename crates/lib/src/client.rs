//! # HTTP Client
//!
//! A client for the `spotter-server` API. It handles request construction and
//! maps every response onto either a typed body or an [`AnalysisError`].

use crate::{
    errors::{AnalysisError, ProviderError},
    transport::{AnalysisTransport, ModelDirectory, UploadGateway},
    types::{
        AnalysisRequest, AnalysisResponse, ErrorResponse, ModelsResponse, UploadResponse,
    },
};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// The client for making API calls to the `spotter-server`.
#[derive(Clone, Debug)]
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
}

impl HttpAnalysisClient {
    /// Creates a new `HttpAnalysisClient`. A trailing `/` on `base_url` is ignored.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .build()
            .map_err(ProviderError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Reads a response body as `T`, or as the service's `{ "error": ... }` payload.
///
/// An `error` field is honoured even on a success status. A failure status
/// without a readable error payload becomes a transport error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AnalysisError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AnalysisError::Transport(e.to_string()))?;
    debug!(%status, body_len = body.len(), "<-- Response from server");

    if let Ok(payload) = serde_json::from_str::<ErrorResponse>(&body) {
        warn!(%status, "Server reported an error: {}", payload.error);
        return Err(AnalysisError::Service(payload.error));
    }
    if !status.is_success() {
        return Err(AnalysisError::Transport(format!(
            "Server responded with {status}"
        )));
    }
    serde_json::from_str(&body)
        .map_err(|e| AnalysisError::Transport(format!("Malformed response from server: {e}")))
}

fn send_error(err: reqwest::Error) -> AnalysisError {
    AnalysisError::Transport(err.to_string())
}

#[async_trait]
impl UploadGateway for HttpAnalysisClient {
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, AnalysisError> {
        let url = self.url("/upload");
        info!("Uploading '{}' ({} bytes) to: {}", file_name, bytes.len(), url);

        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;
        read_json(response).await
    }
}

#[async_trait]
impl ModelDirectory for HttpAnalysisClient {
    async fn list_models(&self) -> Result<ModelsResponse, AnalysisError> {
        let url = self.url("/models");
        info!("Fetching models from: {}", url);
        let response = self.client.get(&url).send().await.map_err(send_error)?;
        read_json(response).await
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let url = self.url("/analyze");
        info!(
            model = %request.model,
            items = request.custom_items.len(),
            "Sending analysis request for '{}' to: {}",
            request.image_path,
            url
        );
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;
        read_json(response).await
    }
}
