//! # pdf-harvest
//!
//! Pulls the embedded raster images and the per-page plain text out of a PDF
//! and writes them into a fresh, timestamped folder.
//!
//! ## Features
//!
//! - **Image extraction**: every image XObject on every page, stored bytes
//!   written without re-encoding (`jpg`, `jp2`, `jb2`, `ccitt`, `raw`)
//! - **Text extraction**: one `text_page_<n>.txt` per page, empty when a page
//!   has no extractable text
//! - **Run folders**: `extract_<YYYYMMDD_HHMMSS>` with `images/` and `texts/`,
//!   or a flat `run_<YYYYMMDD_HHMMSS>` folder
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_harvest::{ExtractionRequest, Extractor, LayoutStyle};
//!
//! # fn main() -> pdf_harvest::Result<()> {
//! let request = ExtractionRequest::new("report.pdf").with_output_base("exports");
//! let result = Extractor::default().run(&request, LayoutStyle::Nested)?;
//!
//! println!(
//!     "{} images, {} pages -> {}",
//!     result.image_count,
//!     result.page_count,
//!     result.layout.run_dir.display()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Front ends that report progress between the two passes prepare an
//! [`OutputLayout`] and call [`Extractor::extract_with_progress`].

pub mod error;
pub mod extractor;
pub mod layout;
pub mod request;
pub mod source;

pub use error::{HarvestError, Result};
pub use extractor::{
    extract_pdf, ExtractOptions, ExtractionResult, Extractor, ImagePhase, Progress,
};
pub use layout::{image_file_name, text_file_name, LayoutStyle, OutputLayout};
pub use request::{clean_path_input, is_regular_file, ExtractionRequest, DEFAULT_OUTPUT_BASE};
pub use source::{
    EmbeddedImage, ImageSource, LopdfImageSource, PageText, PdfExtractTextSource, TextSource,
};

/// Current version of pdf-harvest
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
