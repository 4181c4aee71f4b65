use crate::{errors::ProviderError, providers::ai::VisionProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Used when Ollama answers without a `response` field.
pub const EMPTY_RESPONSE_TEXT: &str = "No response content from model.";

// --- Ollama request and response structures ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize, Debug)]
struct TagEntry {
    name: Option<String>,
}

// --- Ollama Provider implementation ---

/// A provider for a local Ollama server.
#[derive(Clone, Debug)]
pub struct OllamaProvider {
    client: ReqwestClient,
    generate_url: String,
    tags_url: String,
    list_timeout: Duration,
}

impl OllamaProvider {
    /// Creates a new `OllamaProvider`.
    ///
    /// `list_timeout` bounds model listing only; generation has no timeout.
    pub fn new(
        generate_url: String,
        tags_url: String,
        list_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ProviderError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            generate_url,
            tags_url,
            list_timeout,
        })
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl VisionProvider for OllamaProvider {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        images: &[Vec<u8>],
    ) -> Result<String, ProviderError> {
        let request_body = GenerateRequest {
            model,
            prompt,
            images: images.iter().map(|bytes| STANDARD.encode(bytes)).collect(),
            stream: false,
        };

        info!(
            "Sending request to Ollama: {} with model {}",
            self.generate_url, model
        );
        debug!("Prompt sent to Ollama:\n{}", prompt);

        let response = self
            .client
            .post(&self.generate_url)
            .json(&request_body)
            .send()
            .await
            .map_err(ProviderError::from_send)?;
        let response = ensure_success(response).await?;

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(ProviderError::Deserialization)?;
        debug!("Ollama response: {:?}", generated);

        Ok(generated
            .response
            .unwrap_or_else(|| EMPTY_RESPONSE_TEXT.to_string()))
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(&self.tags_url)
            .timeout(self.list_timeout)
            .send()
            .await
            .map_err(ProviderError::from_send)?;
        let response = ensure_success(response).await?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(ProviderError::Deserialization)?;

        Ok(tags
            .models
            .into_iter()
            .filter_map(|m| m.name)
            .filter(|name| !name.is_empty())
            .collect())
    }
}
