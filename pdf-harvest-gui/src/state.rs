//! Form state machine
//!
//! ```text
//! Idle --start(valid)--> Extracting --ok--> ResultShown --dismiss--> Idle
//!   |                        |
//!   +--start(invalid)--+     +--err--> ErrorShown --dismiss--> Idle
//!                      +-------------> ErrorShown
//! ```
//!
//! A start while `Extracting` is refused and changes nothing. Starting from a
//! shown dialog replaces the dialog. Runs started through the JSON endpoint
//! [`claim`](FormState::claim) the busy guard without touching the fields and
//! put the previous phase back when they end.

use std::path::PathBuf;

use pdf_harvest::{ExtractionRequest, ExtractionResult};
use thiserror::Error;

use crate::i18n::{Label, Language};

/// Counts and location shown in the success dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub image_count: usize,
    pub page_count: usize,
    pub run_dir: PathBuf,
}

impl From<&ExtractionResult> for RunSummary {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            image_count: result.image_count,
            page_count: result.page_count,
            run_dir: result.layout.run_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Extracting,
    ResultShown(RunSummary),
    ErrorShown(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("an extraction is already running")]
    Busy,

    #[error("PDF file path is invalid: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// Everything the form page renders from.
#[derive(Debug, Clone)]
pub struct FormState {
    pub language: Language,
    pub pdf_path: String,
    pub output_dir: String,
    pub phase: Phase,
    /// Run folder of the last successful extraction
    pub last_run_dir: Option<PathBuf>,
}

impl FormState {
    pub fn new(language: Language, output_dir: impl Into<String>) -> Self {
        Self {
            language,
            pdf_path: String::new(),
            output_dir: output_dir.into(),
            phase: Phase::Idle,
            last_run_dir: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Extracting
    }

    pub fn can_open_folder(&self) -> bool {
        self.last_run_dir.is_some()
    }

    /// Record the submitted fields and move to `Extracting` when the path is
    /// valid. An invalid path shows the error dialog instead.
    pub fn begin(
        &mut self,
        pdf_path: &str,
        output_dir: &str,
    ) -> Result<ExtractionRequest, StateError> {
        if self.is_busy() {
            return Err(StateError::Busy);
        }

        self.pdf_path = pdf_path.trim().to_string();
        self.output_dir = output_dir.trim().to_string();

        let request = ExtractionRequest::from_input(&self.pdf_path, Some(&self.output_dir));
        if request.validate().is_err() {
            self.phase = Phase::ErrorShown(self.language.label(Label::InvalidPath).to_string());
            return Err(StateError::InvalidPath(request.pdf_path));
        }

        self.phase = Phase::Extracting;
        Ok(request)
    }

    /// Leave `Extracting` with the outcome of the run.
    pub fn finish(&mut self, outcome: Result<RunSummary, String>) {
        if !self.is_busy() {
            tracing::warn!(phase = ?self.phase, "finish called outside an extraction");
        }
        self.phase = match outcome {
            Ok(summary) => {
                self.last_run_dir = Some(summary.run_dir.clone());
                Phase::ResultShown(summary)
            }
            Err(message) => Phase::ErrorShown(message),
        };
    }

    /// Hold the busy guard for a run started outside the form. The fields are
    /// left alone; the phase shown before is returned for [`FormState::release`].
    pub fn claim(&mut self) -> Result<Phase, StateError> {
        if self.is_busy() {
            return Err(StateError::Busy);
        }
        Ok(std::mem::replace(&mut self.phase, Phase::Extracting))
    }

    /// End a claimed run and put back the phase it interrupted.
    pub fn release(&mut self, previous: Phase, run_dir: Option<PathBuf>) {
        if run_dir.is_some() {
            self.last_run_dir = run_dir;
        }
        self.phase = previous;
    }

    /// Show an error dialog that did not come from an extraction.
    pub fn show_error(&mut self, message: impl Into<String>) {
        if !self.is_busy() {
            self.phase = Phase::ErrorShown(message.into());
        }
    }

    /// Close whichever dialog is open.
    pub fn dismiss(&mut self) {
        if matches!(self.phase, Phase::ResultShown(_) | Phase::ErrorShown(_)) {
            self.phase = Phase::Idle;
        }
    }
}
