pub mod ollama;

use crate::errors::ProviderError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a vision-language inference service.
///
/// This trait defines a common interface for asking a model about an image and
/// for discovering which models the service can run.
#[async_trait]
pub trait VisionProvider: Send + Sync + Debug + DynClone {
    /// Generates a response for a prompt about the given images.
    ///
    /// The result should be the model's raw text output.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        images: &[Vec<u8>],
    ) -> Result<String, ProviderError>;

    /// Lists the identifiers of the models the service has available.
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;
}

dyn_clone::clone_trait_object!(VisionProvider);
