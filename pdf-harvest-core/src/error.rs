use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("File does not exist or path is incorrect: {}", .0.display())]
    InvalidInput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Text extraction error: {0}")]
    Text(String),

    #[error("Page count mismatch: image pass saw {images} pages, text pass saw {texts}")]
    PageCountMismatch { images: usize, texts: usize },
}

pub type Result<T> = std::result::Result<T, HarvestError>;

impl From<pdf_extract::OutputError> for HarvestError {
    fn from(err: pdf_extract::OutputError) -> Self {
        match err {
            pdf_extract::OutputError::IoError(e) => HarvestError::Io(e),
            pdf_extract::OutputError::PdfError(e) => HarvestError::Pdf(e),
            other => HarvestError::Text(other.to_string()),
        }
    }
}
