//! Fixture PDF Builder
//!
//! Writes small PDFs object by object so a test decides exactly which image
//! XObjects each page lists and which text it draws.

use std::fmt::Write as _;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

const CATALOG_OBJ: u32 = 1;
const PAGES_OBJ: u32 = 2;
const FONT_OBJ: u32 = 3;
const FIRST_IMAGE_OBJ: u32 = 4;

/// US Letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

/// Handle to an image registered with [`FixturePdfBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageId(usize);

#[derive(Debug, Clone)]
struct FixtureImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    filter: Option<&'static str>,
    data: Vec<u8>,
}

/// Content of one fixture page.
#[derive(Debug, Clone, Default)]
pub struct FixturePage {
    lines: Vec<String>,
    images: Vec<ImageId>,
    draw_images: bool,
}

impl FixturePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `text` in Helvetica, one line per `\n`.
    pub fn with_text(mut self, text: &str) -> Self {
        self.lines.extend(text.lines().map(str::to_string));
        self
    }

    /// List `image` in the page's XObject resources.
    pub fn with_image(mut self, image: ImageId) -> Self {
        self.images.push(image);
        self
    }

    /// Also paint the listed images with `Do`.
    pub fn drawn(mut self) -> Self {
        self.draw_images = true;
        self
    }

    fn content_stream(&self) -> String {
        let mut content = String::new();

        if !self.lines.is_empty() {
            content.push_str("BT\n/F1 12 Tf\n72 720 Td\n");
            for (i, line) in self.lines.iter().enumerate() {
                if i > 0 {
                    content.push_str("0 -16 Td\n");
                }
                let _ = writeln!(content, "({}) Tj", escape_pdf_string(line));
            }
            content.push_str("ET\n");
        }

        if self.draw_images {
            for position in 1..=self.images.len() {
                let y = 600 - 60 * position;
                let _ = writeln!(content, "q 50 0 0 50 72 {y} cm /Im{position} Do Q");
            }
        }
        content
    }
}

/// Builder for fixture PDFs
#[derive(Debug, Clone, Default)]
pub struct FixturePdfBuilder {
    images: Vec<FixtureImage>,
    pages: Vec<FixturePage>,
}

impl FixturePdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a baseline JPEG. The bytes are stored under `/DCTDecode`.
    pub fn add_jpeg(&mut self, jpeg: Vec<u8>, width: u32, height: u32) -> ImageId {
        self.push_image(FixtureImage {
            width,
            height,
            color_space: "DeviceRGB",
            filter: Some("DCTDecode"),
            data: jpeg,
        })
    }

    /// Register unfiltered 8-bit gray samples.
    pub fn add_gray_samples(&mut self, samples: Vec<u8>, width: u32, height: u32) -> ImageId {
        self.push_image(FixtureImage {
            width,
            height,
            color_space: "DeviceGray",
            filter: None,
            data: samples,
        })
    }

    fn push_image(&mut self, image: FixtureImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    pub fn add_page(&mut self, page: FixturePage) -> &mut Self {
        self.pages.push(page);
        self
    }

    /// Add a page with text and nothing else
    pub fn add_text_page(&mut self, text: &str) -> &mut Self {
        self.add_page(FixturePage::new().with_text(text))
    }

    /// Add a page with no content at all
    pub fn add_empty_page(&mut self) -> &mut Self {
        self.add_page(FixturePage::new())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_obj(&self, page_index: usize) -> u32 {
        FIRST_IMAGE_OBJ + self.images.len() as u32 + 2 * page_index as u32
    }

    fn image_obj(image: ImageId) -> u32 {
        FIRST_IMAGE_OBJ + image.0 as u32
    }

    /// Build the PDF
    pub fn build(&self) -> Vec<u8> {
        let mut writer = ObjectWriter::new("1.4");

        writer.object(
            CATALOG_OBJ,
            format!("<< /Type /Catalog /Pages {PAGES_OBJ} 0 R >>").as_bytes(),
        );

        let kids: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", self.page_obj(i)))
            .collect();
        writer.object(
            PAGES_OBJ,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.pages.len()
            )
            .as_bytes(),
        );

        writer.object(
            FONT_OBJ,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );

        for (i, image) in self.images.iter().enumerate() {
            let mut dict = format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} /BitsPerComponent 8",
                image.width, image.height, image.color_space
            );
            if let Some(filter) = image.filter {
                let _ = write!(dict, " /Filter /{filter}");
            }
            writer.stream(Self::image_obj(ImageId(i)), &dict, &image.data);
        }

        for (i, page) in self.pages.iter().enumerate() {
            let page_obj = self.page_obj(i);
            let content_obj = page_obj + 1;

            let mut xobjects = String::new();
            for (position, image) in page.images.iter().enumerate() {
                let _ = write!(xobjects, " /Im{} {} 0 R", position + 1, Self::image_obj(*image));
            }

            writer.object(
                page_obj,
                format!(
                    "<< /Type /Page /Parent {PAGES_OBJ} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 {FONT_OBJ} 0 R >> /XObject <<{xobjects} >> >> \
                     /Contents {content_obj} 0 R >>"
                )
                .as_bytes(),
            );
            writer.stream(content_obj, "", page.content_stream().as_bytes());
        }

        writer.finish(CATALOG_OBJ)
    }

    /// Build and write to `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.build())?;
        Ok(())
    }
}

/// Sequential object writer that records offsets for the xref table.
struct ObjectWriter {
    pdf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new(version: &str) -> Self {
        let mut pdf = format!("%PDF-{version}\n").into_bytes();
        pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            pdf,
            offsets: Vec::new(),
        }
    }

    /// Objects must arrive numbered 1, 2, 3, ...
    fn object(&mut self, number: u32, body: &[u8]) {
        debug_assert_eq!(number as usize, self.offsets.len() + 1);
        self.offsets.push(self.pdf.len());
        self.pdf
            .extend_from_slice(format!("{number} 0 obj\n").as_bytes());
        self.pdf.extend_from_slice(body);
        self.pdf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, number: u32, dict: &str, data: &[u8]) {
        let mut body = format!("<< {dict} /Length {} >>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(number, &body);
    }

    fn finish(mut self, root: u32) -> Vec<u8> {
        let size = self.offsets.len() + 1;
        let xref_offset = self.pdf.len();

        self.pdf.extend_from_slice(b"xref\n");
        self.pdf
            .extend_from_slice(format!("0 {size}\n").as_bytes());
        self.pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.pdf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }

        self.pdf.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF")
                .as_bytes(),
        );
        self.pdf
    }
}

/// Baseline JPEG of a diagonal gradient.
pub fn sample_jpeg(width: u32, height: u32) -> Result<Vec<u8>> {
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });

    let mut jpeg = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixels).write_to(&mut jpeg, ImageFormat::Jpeg)?;
    Ok(jpeg.into_inner())
}

/// Escape special characters in PDF strings
fn escape_pdf_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_builder_is_structurally_complete() {
        let pdf = FixturePdfBuilder::new().build();
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF"));
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/Count 0"));
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("a(b)c\\d"), "a\\(b\\)c\\\\d");
        assert_eq!(escape_pdf_string("plain"), "plain");
    }

    #[test]
    fn test_sample_jpeg_markers() {
        let jpeg = sample_jpeg(16, 8).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_content_stream_draws_only_when_asked() {
        let listed = FixturePage::new().with_image(ImageId(0));
        assert!(!listed.content_stream().contains("Do"));

        let drawn = FixturePage::new().with_image(ImageId(0)).drawn();
        assert!(drawn.content_stream().contains("/Im1 Do"));
    }

    #[test]
    fn test_multiline_text() {
        let page = FixturePage::new().with_text("first\nsecond");
        let content = page.content_stream();
        assert!(content.contains("(first) Tj"));
        assert!(content.contains("0 -16 Td\n(second) Tj"));
    }

    #[test]
    fn test_object_numbers_follow_images() {
        let mut builder = FixturePdfBuilder::new();
        let image = builder.add_gray_samples(vec![0; 4], 2, 2);
        builder.add_page(FixturePage::new().with_image(image));

        assert_eq!(FixturePdfBuilder::image_obj(image), 4);
        assert_eq!(builder.page_obj(0), 5);
        let text = String::from_utf8_lossy(&builder.build()).into_owned();
        assert!(text.contains("/Im1 4 0 R"));
        assert!(text.contains("/Kids [5 0 R]"));
    }
}
