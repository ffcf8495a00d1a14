//! # pdf-harvest-gui
//!
//! The graphical front end of pdf-harvest: a small form served on localhost.
//! Pick a PDF and an output folder, press Start, and the run summary comes
//! back as a dialog. `/api/extract` offers the same workflow to scripts.

mod api;
pub mod browse;
pub mod i18n;
pub mod opener;
pub mod state;
pub mod view;

pub use api::{
    app, health_check, AppError, AppState, ErrorResponse, ExtractRequest, ExtractResponse,
};
pub use i18n::{Label, Language};
pub use opener::{FolderOpener, SystemOpener};
pub use state::{FormState, Phase, RunSummary, StateError};
