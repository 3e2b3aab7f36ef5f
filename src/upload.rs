//! Prescription upload pipeline.
//!
//! Drives one file from selection through the remote analysis call to a
//! result or a reported failure. The pipeline owns its transient state;
//! only a successful analysis touches the shared active context.
//!
//! State machine: Idle → PreviewReady → Submitting → Succeeded | Failed,
//! where both terminal states return to PreviewReady on the next file
//! selection. One submission in flight per instance; a selection or
//! reset during flight supersedes the outstanding request and its late
//! result is discarded.

use std::sync::{Arc, Mutex};

use crate::context::ActiveContextStore;
use crate::services::{AnalysisService, ImagePayload};

/// Shown when the analysis collaborator fails without a usable
/// `details` field.
pub const ANALYSIS_FALLBACK_MESSAGE: &str =
    "We couldn't read the prescription properly. Please try a clearer photo.";

/// Externally observable pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// Nothing selected yet.
    Idle,
    /// A file is selected and previewable.
    PreviewReady,
    /// One analysis request is in flight.
    Submitting,
    /// The last submission produced an active analysis result.
    Succeeded,
    /// The last submission failed; `error_message` explains it.
    Failed,
}

/// Local preview reference for the currently selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub file_name: String,
    pub content_type: String,
    pub byte_len: usize,
}

/// What a `submit` call amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Analysis succeeded; the result is in the active context.
    Succeeded,
    /// Analysis failed; the pipeline holds a user-facing message.
    Failed,
    /// Nothing to do: no file selected, or a submission already in flight.
    Ignored,
    /// A newer selection or a reset overtook this submission mid-flight;
    /// its result was discarded.
    Superseded,
}

struct PipelineInner {
    state: UploadState,
    selected: Option<ImagePayload>,
    error: Option<String>,
    /// Bumped by select_file/reset; a completion whose captured
    /// generation no longer matches is stale and must not apply.
    generation: u64,
}

pub struct UploadPipeline {
    analysis: Arc<dyn AnalysisService>,
    context: Arc<ActiveContextStore>,
    inner: Mutex<PipelineInner>,
}

impl UploadPipeline {
    pub fn new(analysis: Arc<dyn AnalysisService>, context: Arc<ActiveContextStore>) -> Self {
        Self {
            analysis,
            context,
            inner: Mutex::new(PipelineInner {
                state: UploadState::Idle,
                selected: None,
                error: None,
                generation: 0,
            }),
        }
    }

    pub fn state(&self) -> UploadState {
        self.inner
            .lock()
            .map(|inner| inner.state)
            .unwrap_or(UploadState::Idle)
    }

    pub fn error_message(&self) -> Option<String> {
        self.inner
            .lock()
            .map(|inner| inner.error.clone())
            .unwrap_or(None)
    }

    pub fn preview(&self) -> Option<FilePreview> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| {
                inner.selected.as_ref().map(|image| FilePreview {
                    file_name: image.file_name.clone(),
                    content_type: image.content_type.clone(),
                    byte_len: image.bytes.len(),
                })
            })
    }

    /// Select a file for upload. Last write wins: a second selection
    /// before submission discards the first, and any in-flight
    /// submission is superseded. Clears a previous error.
    pub fn select_file(&self, file_name: &str, bytes: Vec<u8>) {
        let content_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        if let Ok(mut inner) = self.inner.lock() {
            inner.selected = Some(ImagePayload {
                file_name: file_name.to_string(),
                content_type,
                bytes,
            });
            inner.state = UploadState::PreviewReady;
            inner.error = None;
            inner.generation += 1;
            tracing::debug!(file_name, "prescription file selected");
        }
    }

    /// Forget the selection and return to Idle. Any in-flight
    /// submission is superseded (used on view unmount).
    pub fn reset(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.selected = None;
            inner.state = UploadState::Idle;
            inner.error = None;
            inner.generation += 1;
        }
    }

    /// Submit the selected file to the analysis collaborator.
    ///
    /// While a submission is in flight, another call is a no-op (the
    /// pipeline itself rejects re-entry, independent of the UI
    /// disabling the trigger). On success the result lands in the
    /// active context; the pipeline never touches the view state.
    pub async fn submit(&self) -> SubmitOutcome {
        let (image, generation) = {
            let Ok(mut inner) = self.inner.lock() else {
                return SubmitOutcome::Ignored;
            };
            if inner.state == UploadState::Submitting {
                tracing::debug!("submit ignored: analysis already in flight");
                return SubmitOutcome::Ignored;
            }
            let Some(image) = inner.selected.clone() else {
                tracing::debug!("submit ignored: no file selected");
                return SubmitOutcome::Ignored;
            };
            inner.state = UploadState::Submitting;
            inner.error = None;
            (image, inner.generation)
        };

        let file_name = image.file_name.clone();
        let outcome = self.analysis.analyze(image).await;

        let result = {
            let Ok(mut inner) = self.inner.lock() else {
                return SubmitOutcome::Ignored;
            };
            if inner.generation != generation {
                tracing::debug!(file_name = %file_name, "discarding stale analysis completion");
                return SubmitOutcome::Superseded;
            }
            match outcome {
                Ok(result) => {
                    inner.state = UploadState::Succeeded;
                    Some(result)
                }
                Err(error) => {
                    tracing::warn!(file_name = %file_name, error = %error, "prescription analysis failed");
                    inner.state = UploadState::Failed;
                    inner.error = Some(error.user_message(ANALYSIS_FALLBACK_MESSAGE));
                    None
                }
            }
        };

        match result {
            Some(result) => {
                tracing::info!(
                    file_name = %file_name,
                    medicines = result.medicines.len(),
                    "prescription analysis succeeded"
                );
                self.context.set(Some(result));
                SubmitOutcome::Succeeded
            }
            None => SubmitOutcome::Failed,
        }
    }
}
