use async_trait::async_trait;
use spotter::errors::ProviderError;
use spotter::providers::ai::VisionProvider;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Fixtures ---

/// The 8-byte PNG signature followed by a truncated IHDR chunk.
///
/// Good enough for anything that only moves image bytes around.
pub const TINY_PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, b'I', b'H', b'D', b'R',
];

/// A model answer in the format the analysis prompt asks for.
pub const SAMPLE_MODEL_OUTPUT: &str = "**Found Items:**\n\
    * cat [0.92] (asleep on the sofa)\n\
    **Maybe Found Item:**\n\
    * dog [0.55]\n\
    **Not Found Item:**\n\
    * bird [0.05]\n";

// --- Mock Vision Provider ---

/// One recorded call to [`VisionProvider::generate`].
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateCall {
    pub model: String,
    pub prompt: String,
    pub images: Vec<Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct MockVisionProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    models: Arc<Mutex<Option<Vec<String>>>>,
    calls: Arc<Mutex<Vec<GenerateCall>>>,
}

impl MockVisionProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            models: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for prompts containing `key`.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Sets what `list_models` returns. Without it, listing fails.
    pub fn set_models(&self, models: &[&str]) {
        *self.models.lock().unwrap() = Some(models.iter().map(|m| m.to_string()).collect());
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockVisionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        images: &[Vec<u8>],
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(GenerateCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            images: images.to_vec(),
        });

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(ProviderError::Api {
            status: 404,
            body: format!("MockVisionProvider: No response programmed for model '{model}'"),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        self.models
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::Api {
                status: 500,
                body: "MockVisionProvider: No models programmed".to_string(),
            })
    }
}
