//! Operator input for one extraction run.

use std::path::{Path, PathBuf};

use crate::error::{HarvestError, Result};

/// Output base used when the operator does not choose one.
pub const DEFAULT_OUTPUT_BASE: &str = "output";

/// Source PDF plus the directory under which the run folder is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub pdf_path: PathBuf,
    pub output_base: PathBuf,
}

impl ExtractionRequest {
    /// Request with the default output base.
    pub fn new(pdf_path: impl Into<PathBuf>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            output_base: PathBuf::from(DEFAULT_OUTPUT_BASE),
        }
    }

    pub fn with_output_base(mut self, output_base: impl Into<PathBuf>) -> Self {
        self.output_base = output_base.into();
        self
    }

    /// Build a request from raw form or prompt input. Blank output input falls
    /// back to [`DEFAULT_OUTPUT_BASE`].
    pub fn from_input(pdf_path: &str, output_base: Option<&str>) -> Self {
        let output_base = output_base
            .map(str::trim)
            .filter(|base| !base.is_empty())
            .unwrap_or(DEFAULT_OUTPUT_BASE);
        Self::new(clean_path_input(pdf_path)).with_output_base(output_base)
    }

    /// Checks that the source references an existing regular file. Touches
    /// nothing on disk.
    pub fn validate(&self) -> Result<()> {
        if is_regular_file(&self.pdf_path) {
            Ok(())
        } else {
            Err(HarvestError::InvalidInput(self.pdf_path.clone()))
        }
    }
}

/// Trim whitespace and one pair of matching quotes, as terminals add them when
/// a file is dragged onto the window.
pub fn clean_path_input(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

pub fn is_regular_file(path: &Path) -> bool {
    path.metadata().map(|meta| meta.is_file()).unwrap_or(false)
}
