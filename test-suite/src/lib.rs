//! Test Suite for pdf-harvest
//!
//! Fixture PDFs and helpers shared by the core, CLI and GUI tests.

pub mod fixtures;

pub use fixtures::{sample_jpeg, FixturePage, FixturePdfBuilder, ImageId};

/// Common test utilities
pub mod utils {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::fixtures::{sample_jpeg, FixturePage, FixturePdfBuilder};

    /// Create a temporary directory for test outputs
    pub fn create_test_output_dir() -> anyhow::Result<tempfile::TempDir> {
        Ok(tempfile::tempdir()?)
    }

    /// Write `bytes` to `dir/name` and return the full path
    pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Two pages: page 1 carries text and one JPEG, page 2 carries text only.
    /// Returns the PDF path and the JPEG bytes embedded in it.
    pub fn two_page_report(dir: &Path) -> anyhow::Result<(PathBuf, Vec<u8>)> {
        let jpeg = sample_jpeg(32, 24)?;
        let mut builder = FixturePdfBuilder::new();
        let photo = builder.add_jpeg(jpeg.clone(), 32, 24);
        builder
            .add_page(FixturePage::new().with_text("Quarterly report").with_image(photo))
            .add_text_page("Appendix");

        let path = write_fixture(dir, "report.pdf", &builder.build())?;
        Ok((path, jpeg))
    }
}
