use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use spotter::{errors::ProviderError, types::ErrorResponse};
use tracing::{error, warn};

use crate::uploads::UploadError;

/// A custom error type for the server application.
///
/// Every variant renders as a JSON body of the form `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    /// The request itself is unusable.
    BadRequest(String),
    /// A resource the request relies on no longer exists.
    NotFound(String),
    /// The uploaded file failed validation.
    Upload(UploadError),
    /// The multipart body could not be read.
    Multipart(MultipartError),
    /// The inference service could not be reached or returned an error.
    Provider(ProviderError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart(err)
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => {
                warn!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound(message) => {
                warn!("Not found: {}", message);
                (StatusCode::NOT_FOUND, message)
            }
            AppError::Upload(UploadError::Storage(msg)) => {
                error!("Upload storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An unexpected error occurred: {msg}"),
                )
            }
            AppError::Upload(err) => {
                warn!("Rejected upload: {}", err);
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Multipart(err) => {
                warn!("Multipart error: {}", err);
                (err.status(), err.body_text())
            }
            AppError::Provider(err) => {
                error!("ProviderError: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to connect to Ollama or process image: {err}"),
                )
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An unexpected error occurred: {err}"),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            models: None,
        });

        (status_code, body).into_response()
    }
}
