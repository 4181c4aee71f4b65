//! # Spotter
//!
//! Finds items in an image with a locally running vision-language model and
//! sorts what the model reports into `found`, `maybe_found`, `not_found`, and
//! `unparsed_or_other` using caller-supplied confidence thresholds.
//!
//! The client side of the workflow lives in [`orchestrator::AnalysisSession`],
//! which builds a request ([`request`]), sends it through an
//! [`transport::AnalysisTransport`], categorizes the response ([`categorize`]),
//! and drives a [`presenter::ResultPresenter`]. The server side uses
//! [`providers::ai::VisionProvider`], [`prompts`], and [`parser`] to turn an
//! uploaded image into the categorized wire response.

pub mod categorize;
pub mod client;
pub mod constants;
pub mod errors;
pub mod orchestrator;
pub mod parser;
pub mod presenter;
pub mod prompts;
pub mod providers;
pub mod request;
pub mod transport;
pub mod types;

pub use categorize::{categorize, categorize_response, Bucket};
pub use client::HttpAnalysisClient;
pub use errors::{AnalysisError, ProviderError};
pub use orchestrator::{AnalysisSession, AnalysisState, Completion, Submission};
pub use presenter::ResultPresenter;
pub use types::{
    AnalysisRequest, AnalysisResponse, CategorizedResult, EchoedItem, ItemQuery, ItemSignal,
    ThresholdConfig, UploadReference,
};
