//! Output layout builder
//!
//! Every run gets a fresh folder named after the local time it started, so
//! results from earlier runs are never overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::Result;

/// Timestamp format used in run folder names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// How a run folder is organised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStyle {
    /// `extract_<ts>/images/` and `extract_<ts>/texts/`
    Nested,
    /// `run_<ts>/` holding images and texts side by side
    Flat,
}

impl LayoutStyle {
    pub fn prefix(self) -> &'static str {
        match self {
            LayoutStyle::Nested => "extract_",
            LayoutStyle::Flat => "run_",
        }
    }
}

/// Directories of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub run_dir: PathBuf,
    pub images_dir: PathBuf,
    pub texts_dir: PathBuf,
}

impl OutputLayout {
    /// Create the run folder for the current local time.
    pub fn prepare(base_dir: impl AsRef<Path>, style: LayoutStyle) -> Result<Self> {
        Self::prepare_at(base_dir, style, Local::now().naive_local())
    }

    /// Create the run folder for `timestamp`. Existing folders are reused
    /// without error.
    pub fn prepare_at(
        base_dir: impl AsRef<Path>,
        style: LayoutStyle,
        timestamp: NaiveDateTime,
    ) -> Result<Self> {
        let layout = Self::plan(base_dir.as_ref(), style, timestamp);

        fs::create_dir_all(&layout.images_dir)?;
        fs::create_dir_all(&layout.texts_dir)?;

        tracing::debug!(run_dir = %layout.run_dir.display(), "prepared output layout");
        Ok(layout)
    }

    /// Compute the paths without touching the filesystem.
    pub fn plan(base_dir: &Path, style: LayoutStyle, timestamp: NaiveDateTime) -> Self {
        let run_dir = base_dir.join(run_dir_name(style, timestamp));
        match style {
            LayoutStyle::Nested => Self {
                images_dir: run_dir.join("images"),
                texts_dir: run_dir.join("texts"),
                run_dir,
            },
            LayoutStyle::Flat => Self {
                images_dir: run_dir.clone(),
                texts_dir: run_dir.clone(),
                run_dir,
            },
        }
    }
}

pub fn run_dir_name(style: LayoutStyle, timestamp: NaiveDateTime) -> String {
    format!("{}{}", style.prefix(), timestamp.format(TIMESTAMP_FORMAT))
}

/// `image_p<page>_<index>.<ext>`, both numbers 1-based.
pub fn image_file_name(page: u32, index: u32, extension: &str) -> String {
    format!("image_p{page}_{index}.{extension}")
}

/// `text_page_<page>.txt`, 1-based.
pub fn text_file_name(page: u32) -> String {
    format!("text_page_{page}.txt")
}
