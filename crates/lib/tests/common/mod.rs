#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared mocks for the library's integration tests: a presenter that records
//! every call and a transport that replays canned outcomes.

use async_trait::async_trait;
use dotenvy::dotenv;
use spotter::{
    errors::AnalysisError,
    presenter::ResultPresenter,
    transport::{AnalysisTransport, UploadGateway},
    types::{AnalysisRequest, AnalysisResponse, CategorizedResult, UploadResponse},
};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

// --- Recording Presenter ---

#[derive(Clone, Debug, PartialEq)]
pub enum PresenterEvent {
    Loading(bool),
    Clear,
    Result(CategorizedResult),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn loading_calls(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Loading(on) => Some(*on),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Error(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ResultPresenter for RecordingPresenter {
    fn set_loading(&mut self, loading: bool) {
        self.events.push(PresenterEvent::Loading(loading));
    }

    fn clear(&mut self) {
        self.events.push(PresenterEvent::Clear);
    }

    fn show_result(&mut self, result: &CategorizedResult) {
        self.events.push(PresenterEvent::Result(result.clone()));
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(PresenterEvent::Error(message.to_string()));
    }
}

// --- Mock Transport ---

/// Replays queued outcomes in order and records every request it receives.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    pub outcomes: Arc<Mutex<Vec<Result<AnalysisResponse, AnalysisError>>>>,
    pub requests: Arc<Mutex<Vec<AnalysisRequest>>>,
    pub upload_outcome: Arc<Mutex<Option<Result<UploadResponse, AnalysisError>>>>,
}

impl MockTransport {
    pub fn new(outcomes: Vec<Result<AnalysisResponse, AnalysisError>>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into_iter().rev().collect())),
            ..Default::default()
        }
    }

    pub fn with_upload(self, outcome: Result<UploadResponse, AnalysisError>) -> Self {
        *self.upload_outcome.lock().unwrap() = Some(outcome);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalysisTransport for MockTransport {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(AnalysisError::Transport("no canned outcome".to_string())))
    }
}

#[async_trait]
impl UploadGateway for MockTransport {
    async fn upload(
        &self,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadResponse, AnalysisError> {
        self.upload_outcome
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| {
                Ok(UploadResponse {
                    message: "Image uploaded successfully".to_string(),
                    filepath: format!("static/uploads/{file_name}"),
                })
            })
    }
}
