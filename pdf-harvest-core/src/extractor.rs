//! Extraction orchestrator
//!
//! Runs the image pass and then the text pass against one PDF and writes the
//! results into an [`OutputLayout`]. The two passes open the document
//! independently; their page counts are compared afterwards.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{HarvestError, Result};
use crate::layout::{image_file_name, text_file_name, LayoutStyle, OutputLayout};
use crate::request::ExtractionRequest;
use crate::source::{ImageSource, LopdfImageSource, PdfExtractTextSource, TextSource};

/// Options for an extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Fail when the image and text passes disagree on the page count.
    /// Disagreement is only logged otherwise.
    pub strict_page_count: bool,
}

/// Outcome of the image pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePhase {
    /// Image files written
    pub image_count: usize,
    /// Pages the image session saw
    pub page_count: usize,
}

/// Outcome of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Image files written
    pub image_count: usize,
    /// Text files written, one per page
    pub page_count: usize,
    /// Pages the image session saw
    pub image_pages: usize,
    pub layout: OutputLayout,
}

/// Milestones reported while [`Extractor::extract_with_progress`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    ImagesStarted,
    ImagesFinished(ImagePhase),
    TextStarted,
    /// Text files written
    TextFinished(usize),
}

/// Drives one image source and one text source.
#[derive(Debug, Clone)]
pub struct Extractor<I = LopdfImageSource, T = PdfExtractTextSource> {
    images: I,
    texts: T,
    options: ExtractOptions,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(LopdfImageSource, PdfExtractTextSource)
    }
}

impl<I: ImageSource, T: TextSource> Extractor<I, T> {
    pub fn new(images: I, texts: T) -> Self {
        Self {
            images,
            texts,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Write every embedded image of `pdf_path` into `images_dir`.
    pub fn extract_images(&self, pdf_path: &Path, images_dir: &Path) -> Result<ImagePhase> {
        let mut image_count = 0;

        let page_count = self.images.visit_images(pdf_path, &mut |image| {
            let path = images_dir.join(image_file_name(image.page, image.index, &image.extension));
            let mut file = File::create(&path)?;
            file.write_all(&image.data)?;

            tracing::debug!(path = %path.display(), bytes = image.data.len(), "wrote image");
            image_count += 1;
            Ok(())
        })?;

        tracing::info!(image_count, page_count, "image pass finished");
        Ok(ImagePhase {
            image_count,
            page_count,
        })
    }

    /// Write one text file per page of `pdf_path` into `texts_dir` and return
    /// the page count.
    pub fn extract_text(&self, pdf_path: &Path, texts_dir: &Path) -> Result<usize> {
        let mut page_count = 0;

        self.texts.visit_pages(pdf_path, &mut |page| {
            let path = texts_dir.join(text_file_name(page.page));
            let mut file = File::create(&path)?;
            file.write_all(page.text.as_deref().unwrap_or("").as_bytes())?;

            tracing::debug!(path = %path.display(), empty = page.text.is_none(), "wrote page text");
            page_count += 1;
            Ok(())
        })?;

        tracing::info!(page_count, "text pass finished");
        Ok(page_count)
    }

    /// Image pass, then text pass, into an already prepared layout.
    pub fn extract(&self, pdf_path: &Path, layout: &OutputLayout) -> Result<ExtractionResult> {
        self.extract_with_progress(pdf_path, layout, &mut |_| Ok(()))
    }

    /// Same as [`Extractor::extract`], calling `on_progress` around each pass.
    /// An error from the callback stops the run.
    pub fn extract_with_progress(
        &self,
        pdf_path: &Path,
        layout: &OutputLayout,
        on_progress: &mut dyn FnMut(Progress) -> Result<()>,
    ) -> Result<ExtractionResult> {
        on_progress(Progress::ImagesStarted)?;
        let images = self.extract_images(pdf_path, &layout.images_dir)?;
        on_progress(Progress::ImagesFinished(images))?;

        on_progress(Progress::TextStarted)?;
        let page_count = self.extract_text(pdf_path, &layout.texts_dir)?;
        on_progress(Progress::TextFinished(page_count))?;

        self.check_page_counts(images.page_count, page_count)?;

        Ok(ExtractionResult {
            image_count: images.image_count,
            page_count,
            image_pages: images.page_count,
            layout: layout.clone(),
        })
    }

    /// Validate the request, create a fresh run folder and extract into it.
    /// Nothing is created when validation fails.
    pub fn run(&self, request: &ExtractionRequest, style: LayoutStyle) -> Result<ExtractionResult> {
        request.validate()?;
        let layout = OutputLayout::prepare(&request.output_base, style)?;
        tracing::info!(
            pdf = %request.pdf_path.display(),
            run_dir = %layout.run_dir.display(),
            "starting extraction"
        );
        self.extract(&request.pdf_path, &layout)
    }

    /// Compare the page counts the two sessions reported.
    pub fn check_page_counts(&self, image_pages: usize, text_pages: usize) -> Result<()> {
        if image_pages == text_pages {
            return Ok(());
        }
        if self.options.strict_page_count {
            return Err(HarvestError::PageCountMismatch {
                images: image_pages,
                texts: text_pages,
            });
        }
        tracing::warn!(image_pages, text_pages, "image and text passes disagree on page count");
        Ok(())
    }
}

/// Run the default extractor on `request`.
pub fn extract_pdf(request: &ExtractionRequest, style: LayoutStyle) -> Result<ExtractionResult> {
    Extractor::default().run(request, style)
}
