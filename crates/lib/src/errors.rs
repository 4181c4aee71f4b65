use thiserror::Error;

/// Errors raised while preparing, sending, or interpreting an analysis.
///
/// Only [`AnalysisError::MissingUpload`], [`AnalysisError::Transport`] and
/// [`AnalysisError::Service`] are ever shown to the user. `MalformedSignal` and
/// `InvalidThreshold` describe anomalies that are absorbed into the categorized
/// output; they surface only through diagnostics such as
/// [`ThresholdConfig::validate`](crate::types::ThresholdConfig::validate).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Please upload an image first.")]
    MissingUpload,
    #[error("An analysis is already in progress.")]
    Busy,
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Service(String),
    #[error("Item '{0}' has no usable confidence")]
    MalformedSignal(String),
    #[error("Threshold '{name}' is not a finite number ({value})")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("maybe_low ({maybe_low}) is greater than found_low ({found_low})")]
    InvertedThresholds { found_low: f64, maybe_low: f64 },
}

impl AnalysisError {
    /// The text handed to the presenter's failure channel.
    ///
    /// Service messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Service(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors from the inference service client.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to inference service: {0}")]
    Request(reqwest::Error),
    #[error("Timed out waiting for inference service: {0}")]
    Timeout(reqwest::Error),
    #[error("Failed to deserialize inference service response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Inference service returned an error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl ProviderError {
    /// Classifies a `reqwest` send error, separating timeouts from other failures.
    pub fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err)
        } else {
            ProviderError::Request(err)
        }
    }
}
