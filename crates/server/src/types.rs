use serde::Deserialize;
use serde_json::Value;

/// The JSON body accepted by `POST /analyze`.
///
/// Only `image_path` is required in practice; a missing one is reported as a
/// bad request rather than a deserialization failure.
#[derive(Debug, Deserialize, Default)]
pub struct AnalyzePayload {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub custom_items: Vec<String>,
    /// Logged and otherwise ignored. Categorization happens on the client, so
    /// any shape is accepted here.
    #[serde(default)]
    pub thresholds: Option<Value>,
}
