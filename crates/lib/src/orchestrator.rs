//! # Analysis Orchestrator
//!
//! [`AnalysisSession`] owns everything one user session needs to run analyses:
//! the current upload reference, the analysis state machine, and the presenter
//! that displays its progress.
//!
//! ```text
//! Idle ──begin──▶ Submitting ──complete──▶ Succeeded | Failed ──begin──▶ Submitting …
//! ```
//!
//! Only one submission can be in flight. Each submission carries a generation
//! token and a completion is applied only when its token is still the latest
//! one issued, so a late response from an abandoned submission can never
//! overwrite newer state.

use crate::{
    categorize::categorize_response,
    errors::AnalysisError,
    presenter::ResultPresenter,
    request,
    transport::{AnalysisTransport, UploadGateway},
    types::{AnalysisRequest, AnalysisResponse, CategorizedResult, ThresholdConfig, UploadReference},
};
use tracing::{info, warn};

/// Where the session's analysis currently stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Submitting {
        generation: u64,
    },
    Succeeded(CategorizedResult),
    Failed(AnalysisError),
}

/// A submission that has been started and is waiting for its response.
#[derive(Debug)]
pub struct Submission {
    generation: u64,
    request: AnalysisRequest,
}

impl Submission {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }
}

/// Whether [`AnalysisSession::complete`] applied the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The submission was superseded or abandoned; the outcome was dropped.
    Stale,
}

pub struct AnalysisSession<P: ResultPresenter> {
    presenter: P,
    upload: Option<UploadReference>,
    state: AnalysisState,
    generation: u64,
}

impl<P: ResultPresenter> AnalysisSession<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            presenter,
            upload: None,
            state: AnalysisState::Idle,
            generation: 0,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn upload_reference(&self) -> Option<&UploadReference> {
        self.upload.as_ref()
    }

    /// The latest generation token issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` while a submission is in flight. Callers should disable their
    /// analysis trigger while this holds; [`begin`](Self::begin) rejects
    /// regardless.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, AnalysisState::Submitting { .. })
    }

    /// Uploads an image and makes it the session's active reference.
    ///
    /// The previous reference is dropped before the upload starts and stays
    /// cleared if the upload fails. Any in-flight analysis is abandoned.
    pub async fn upload<G>(
        &mut self,
        gateway: &G,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReference, AnalysisError>
    where
        G: UploadGateway + ?Sized,
    {
        self.abandon();
        self.upload = None;

        match gateway.upload(file_name, bytes).await {
            Ok(response) => {
                info!("{} ({})", response.message, response.filepath);
                let reference = UploadReference::new(response.filepath);
                self.upload = Some(reference.clone());
                Ok(reference)
            }
            Err(e) => {
                warn!("Upload of '{}' failed: {}", file_name, e);
                Err(e)
            }
        }
    }

    /// Sets the active upload reference directly, e.g. for an image that was
    /// uploaded earlier. Any in-flight analysis is abandoned.
    pub fn set_upload(&mut self, reference: Option<UploadReference>) {
        self.abandon();
        self.upload = reference;
    }

    /// Drops the in-flight submission, if any. Its eventual completion will be
    /// reported as [`Completion::Stale`].
    pub fn abandon(&mut self) {
        if let AnalysisState::Submitting { generation } = self.state {
            info!(generation, "Abandoning in-flight analysis");
            self.presenter.set_loading(false);
            self.state = AnalysisState::Idle;
            self.generation += 1;
        }
    }

    /// Starts a submission.
    ///
    /// Rejects with [`AnalysisError::Busy`] while another submission is in
    /// flight, and with [`AnalysisError::MissingUpload`] (shown to the user)
    /// when there is no upload. On success the presenter has been cleared and
    /// is showing the loading indicator; the caller sends
    /// [`Submission::request`] and hands the outcome to
    /// [`complete`](Self::complete).
    pub fn begin(
        &mut self,
        model: &str,
        raw_item_text: &str,
        thresholds: ThresholdConfig,
    ) -> Result<Submission, AnalysisError> {
        if self.is_busy() {
            warn!("Rejecting analysis submission: another one is in flight");
            return Err(AnalysisError::Busy);
        }

        let request = match request::build(self.upload.as_ref(), model, raw_item_text, thresholds)
        {
            Ok(request) => request,
            Err(e) => {
                self.presenter.show_error(&e.user_message());
                return Err(e);
            }
        };

        if !thresholds.is_finite() {
            warn!(
                found_low = thresholds.found_low,
                maybe_low = thresholds.maybe_low,
                "Thresholds are not finite; comparisons against them will fail"
            );
        }

        self.presenter.clear();
        self.presenter.set_loading(true);
        self.generation += 1;
        self.state = AnalysisState::Submitting {
            generation: self.generation,
        };
        info!(
            generation = self.generation,
            model = %request.model,
            "Analysis submitted"
        );

        Ok(Submission {
            generation: self.generation,
            request,
        })
    }

    /// Applies the outcome of a submission if it is still the current one.
    pub fn complete(
        &mut self,
        submission: Submission,
        outcome: Result<AnalysisResponse, AnalysisError>,
    ) -> Completion {
        let current = matches!(
            self.state,
            AnalysisState::Submitting { generation } if generation == submission.generation
        );
        if !current {
            info!(
                generation = submission.generation,
                latest = self.generation,
                "Discarding stale analysis response"
            );
            return Completion::Stale;
        }

        self.presenter.set_loading(false);

        self.state = match outcome {
            Ok(response) => {
                let result = categorize_response(&response, &submission.request.thresholds);
                info!(
                    found = result.found.len(),
                    maybe_found = result.maybe_found.len(),
                    not_found = result.not_found.len(),
                    unparsed = result.unparsed_or_other.len(),
                    "Analysis succeeded"
                );
                self.presenter.show_result(&result);
                AnalysisState::Succeeded(result)
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                self.presenter.show_error(&e.user_message());
                AnalysisState::Failed(e)
            }
        };
        Completion::Applied
    }

    /// Runs one full analysis: begin, send once, complete.
    pub async fn analyze<T>(
        &mut self,
        transport: &T,
        model: &str,
        raw_item_text: &str,
        thresholds: ThresholdConfig,
    ) -> Result<&CategorizedResult, AnalysisError>
    where
        T: AnalysisTransport + ?Sized,
    {
        let submission = self.begin(model, raw_item_text, thresholds)?;
        let outcome = transport.analyze(submission.request()).await;
        self.complete(submission, outcome);

        match &self.state {
            AnalysisState::Succeeded(result) => Ok(result),
            AnalysisState::Failed(e) => Err(e.clone()),
            _ => Err(AnalysisError::Transport(
                "analysis finished without a result".to_string(),
            )),
        }
    }
}
