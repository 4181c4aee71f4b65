//! # Models Handler
//!
//! Lists the models Ollama has available. When Ollama cannot be asked, the
//! configured fallback models are still returned next to the error so the
//! client always has something to offer.

use super::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use spotter::{
    errors::ProviderError,
    types::{ErrorResponse, ModelsResponse},
};
use tracing::{error, info, warn};

fn error_kind(err: &ProviderError) -> &'static str {
    match err {
        ProviderError::ReqwestClientBuild(_) => "ClientBuild",
        ProviderError::Request(_) => "ConnectionError",
        ProviderError::Timeout(_) => "Timeout",
        ProviderError::Deserialization(_) => "InvalidResponse",
        ProviderError::Api { .. } => "HTTPError",
    }
}

/// The handler for `GET /models`.
pub async fn models_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    let fallback = app_state.config.ollama.fallback_models.clone();

    match app_state.vision_provider.list_models().await {
        Ok(models) if models.is_empty() => {
            warn!("Ollama API returned no models or in an unexpected format.");
            (
                StatusCode::OK,
                Json(ModelsResponse {
                    models: fallback,
                    warning: Some("Ollama reported no models. Using default.".to_string()),
                }),
            )
                .into_response()
        }
        Ok(models) => {
            info!("Ollama reported {} models", models.len());
            (
                StatusCode::OK,
                Json(ModelsResponse {
                    models,
                    warning: None,
                }),
            )
                .into_response()
        }
        Err(err @ ProviderError::Timeout(_)) => {
            error!("Timeout connecting to Ollama to list models: {}", err);
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorResponse {
                    error: "Timeout connecting to Ollama to list models. Using default."
                        .to_string(),
                    models: Some(fallback),
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("Could not connect to Ollama to list models: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: format!(
                        "Could not connect to Ollama to list models ({}). Using default.",
                        error_kind(&err)
                    ),
                    models: Some(fallback),
                }),
            )
                .into_response()
        }
    }
}
