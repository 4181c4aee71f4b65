//! # Upload Handler
//!
//! Accepts a multipart form with a single `file` field and stores the image.

use super::{AppError, AppState};
use crate::uploads::UploadError;
use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use spotter::types::UploadResponse;
use tracing::{info, warn};

/// The handler for `POST /upload`.
pub async fn upload_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" && file.is_none() {
            let file_name = field.file_name().unwrap_or("").to_string();
            let bytes = field.bytes().await?.to_vec();
            file = Some((file_name, bytes));
        } else {
            warn!("Ignoring unknown multipart field: {}", name);
        }
    }

    let (file_name, bytes) = file.ok_or(UploadError::MissingFilePart)?;
    info!("Received upload '{}' ({} bytes)", file_name, bytes.len());

    let path = app_state.uploads.save(&file_name, &bytes).await?;

    Ok(Json(UploadResponse {
        message: "Image uploaded successfully".to_string(),
        filepath: path.to_string_lossy().into_owned(),
    }))
}
