//! Invalid PDF Generators
//!
//! Deliberately broken inputs for error handling tests.

use super::builder::FixturePdfBuilder;

/// Plain text with a `.pdf` name in mind
pub fn not_a_pdf() -> Vec<u8> {
    b"Just some text, definitely not a PDF\n".to_vec()
}

/// Zero bytes
pub fn empty_file() -> Vec<u8> {
    Vec::new()
}

/// A valid one-page document cut off halfway through its objects, before the
/// cross-reference table.
pub fn truncated() -> Vec<u8> {
    let mut builder = FixturePdfBuilder::new();
    builder.add_text_page("This document never finishes");
    let mut pdf = builder.build();
    pdf.truncate(pdf.len() / 2);
    pdf
}

/// Objects without the `%PDF-` header line
pub fn missing_header() -> Vec<u8> {
    let mut builder = FixturePdfBuilder::new();
    builder.add_empty_page();
    let pdf = builder.build();
    let body_start = pdf
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |newline| newline + 1);
    pdf[body_start..].to_vec()
}
