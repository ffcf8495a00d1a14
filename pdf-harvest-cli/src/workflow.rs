//! The extraction sequence shared by both command-line front ends

use std::io::{BufRead, Write};

use anyhow::Result;
use pdf_harvest::{
    clean_path_input, ExtractOptions, ExtractionRequest, ExtractionResult, Extractor, LayoutStyle,
    OutputLayout, Progress,
};

use crate::report::{Reporter, Tone};

pub const BANNER: &str = "PDF Image & Text Extractor";
pub const PATH_PROMPT: &str = "Enter the full path to your PDF file: ";
pub const INVALID_PATH: &str = "Error: File does not exist or path is incorrect.";

/// Validate, prepare the run folder, then run both passes with progress lines.
///
/// Returns `Ok(None)` after reporting an invalid path; nothing is created on
/// disk in that case. Extraction failures propagate.
pub fn harvest<W: Write>(
    request: &ExtractionRequest,
    style: LayoutStyle,
    options: ExtractOptions,
    reporter: &mut Reporter<W>,
) -> Result<Option<ExtractionResult>> {
    if let Err(err) = request.validate() {
        tracing::debug!(%err, "rejected input path");
        reporter.line(Tone::Failure, INVALID_PATH)?;
        return Ok(None);
    }

    let layout = OutputLayout::prepare(&request.output_base, style)?;
    let extractor = Extractor::default().with_options(options);

    let result = extractor.extract_with_progress(&request.pdf_path, &layout, &mut |event| {
        match event {
            Progress::ImagesStarted => reporter.line(Tone::Progress, "Extracting images...")?,
            Progress::ImagesFinished(images) => reporter.line(
                Tone::Success,
                &format!(
                    "{} images extracted and saved to: {}",
                    images.image_count,
                    layout.images_dir.display()
                ),
            )?,
            Progress::TextStarted => reporter.line(Tone::Progress, "Extracting text...")?,
            Progress::TextFinished(page_count) => reporter.line(
                Tone::Success,
                &format!(
                    "Text extracted from {} pages and saved to: {}",
                    page_count,
                    layout.texts_dir.display()
                ),
            )?,
        }
        Ok(())
    })?;

    reporter.line(
        Tone::Summary,
        &format!("All results are organized under: {}", layout.run_dir.display()),
    )?;
    Ok(Some(result))
}

/// Banner, one prompt line for the path, then a nested-layout run under the
/// default output base.
pub fn prompt_and_harvest<R: BufRead, W: Write>(
    input: &mut R,
    reporter: &mut Reporter<W>,
) -> Result<Option<ExtractionResult>> {
    reporter.blank()?;
    reporter.line(Tone::Banner, BANNER)?;
    reporter.blank()?;
    reporter.prompt(PATH_PROMPT)?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let request = ExtractionRequest::new(clean_path_input(&line));
    harvest(
        &request,
        LayoutStyle::Nested,
        ExtractOptions::default(),
        reporter,
    )
}
