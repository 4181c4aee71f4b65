//! # Client Transports
//!
//! The collaborators the client core talks to. [`crate::client::HttpAnalysisClient`]
//! implements all three against the `spotter-server` HTTP API.

use crate::{
    errors::AnalysisError,
    types::{AnalysisRequest, AnalysisResponse, ModelsResponse, UploadResponse},
};
use async_trait::async_trait;
use std::fmt::Debug;

/// Sends an image and returns a stable reference path for it.
#[async_trait]
pub trait UploadGateway: Send + Sync + Debug {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<UploadResponse, AnalysisError>;
}

/// Lists the inference models available for analysis.
#[async_trait]
pub trait ModelDirectory: Send + Sync + Debug {
    async fn list_models(&self) -> Result<ModelsResponse, AnalysisError>;
}

/// Carries an [`AnalysisRequest`] to the analysis service.
///
/// Implementations return [`AnalysisError::Service`] with the service's own
/// message when it reports an error, and [`AnalysisError::Transport`] for
/// every other failure.
#[async_trait]
pub trait AnalysisTransport: Send + Sync + Debug {
    async fn analyze(&self, request: &AnalysisRequest)
        -> Result<AnalysisResponse, AnalysisError>;
}
