//! Shared pieces of the `pdfharvest` and `pdfharvest-prompt` binaries.

pub mod logging;
pub mod report;
pub mod workflow;

pub use logging::init_tracing;
pub use report::{color_enabled, Reporter, Tone};
pub use workflow::{harvest, prompt_and_harvest, INVALID_PATH};
