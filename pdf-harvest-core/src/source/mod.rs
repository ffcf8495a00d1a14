//! PDF source libraries
//!
//! The orchestrator sees the PDF only through these two traits. Each call
//! opens its own document session, so the image and text passes never share
//! parser state.

mod lopdf_images;
mod pdf_text;

pub use lopdf_images::{extension_for_filters, LopdfImageSource};
pub use pdf_text::PdfExtractTextSource;

use std::path::Path;

use crate::error::Result;

/// One embedded image object as reported by the image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Page number (1-based)
    pub page: u32,
    /// Position among the page's images (1-based)
    pub index: u32,
    /// File extension matching the stored encoding, without the dot
    pub extension: String,
    pub data: Vec<u8>,
}

/// Text of one page as reported by the text source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page number (1-based)
    pub page: u32,
    /// `None` when the library found nothing to extract
    pub text: Option<String>,
}

/// Enumerates embedded raster images page by page.
pub trait ImageSource {
    /// Calls `visit` for every image in document order and returns the number
    /// of pages the session saw.
    fn visit_images(
        &self,
        pdf_path: &Path,
        visit: &mut dyn FnMut(EmbeddedImage) -> Result<()>,
    ) -> Result<usize>;
}

/// Enumerates pages with their best-effort plain text.
pub trait TextSource {
    /// Calls `visit` once per page in document order.
    fn visit_pages(
        &self,
        pdf_path: &Path,
        visit: &mut dyn FnMut(PageText) -> Result<()>,
    ) -> Result<()>;
}
