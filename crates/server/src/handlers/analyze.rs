//! # Analyze Handler
//!
//! Builds the prompt for the queried items, sends the stored image to Ollama,
//! and returns the model's answer grouped by section header. Threshold
//! categorization is left to the client.

use super::{AppError, AppState};
use crate::types::AnalyzePayload;
use axum::{extract::State, Json};
use serde_json::Value;
use spotter::{
    parser::parse_model_output,
    prompts::build_analysis_prompt,
    types::{AnalysisResponse, EchoedItem, ItemQuery},
};
use std::{io, path::Path};
use tracing::{debug, info};

/// Reads the stored image. It can vanish between resolving the path and
/// reading it, which is reported as not found.
async fn read_image(path: &Path) -> Result<Vec<u8>, AppError> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            AppError::NotFound("Image file not found after upload.".to_string())
        }
        _ => anyhow::anyhow!("Failed to read image '{}': {e}", path.display()).into(),
    })
}

/// The handler for `POST /analyze`.
pub async fn analyze_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let payload: AnalyzePayload = serde_json::from_value(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid analysis request: {e}")))?;

    let image_path = app_state
        .uploads
        .resolve(payload.image_path.as_deref().unwrap_or_default())
        .await
        .ok_or_else(|| AppError::BadRequest("Image path is missing or invalid".to_string()))?;

    let model = payload
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| app_state.config.ollama.default_model.clone());
    let items = ItemQuery::from(payload.custom_items);
    if let Some(thresholds) = &payload.thresholds {
        debug!(%thresholds, "Thresholds received");
    }

    let image = read_image(&image_path).await?;

    let prompt = build_analysis_prompt(&items);
    info!(
        "Sending request to Ollama with model {} ({} queried items)",
        model,
        items.len()
    );
    debug!("Prompt sent to Ollama:\n{}", prompt);

    let raw_output = app_state
        .vision_provider
        .generate(&model, &prompt, &[image])
        .await?;

    let parsed = parse_model_output(&raw_output);
    let unmentioned = parsed.unmentioned(&items);
    if !unmentioned.is_empty() {
        info!("Queried items not mentioned by the model: {:?}", unmentioned);
    }

    let queried_items_echoed = items
        .items()
        .iter()
        .map(|item| EchoedItem {
            item: item.clone(),
            details: None,
        })
        .collect();

    Ok(Json(AnalysisResponse {
        raw_output,
        queried_items_echoed: Some(queried_items_echoed),
        found: parsed.found,
        maybe_found: parsed.maybe_found,
        not_found: parsed.not_found,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_image_reports_a_vanished_file_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.png");
        std::fs::write(&path, b"png").unwrap();
        assert_eq!(read_image(&path).await.unwrap(), b"png".to_vec());

        std::fs::remove_file(&path).unwrap();
        match read_image(&path).await {
            Err(AppError::NotFound(msg)) => {
                assert_eq!(msg, "Image file not found after upload.")
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
