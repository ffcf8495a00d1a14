use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Form, Json, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use pdf_harvest::{ExtractionRequest, ExtractionResult, Extractor, LayoutStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::browse::{self, Field};
use crate::i18n::{Label, Language};
use crate::opener::FolderOpener;
use crate::state::{FormState, RunSummary, StateError};
use crate::view;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    form: Arc<Mutex<FormState>>,
    opener: Arc<dyn FolderOpener>,
}

impl AppState {
    pub fn new(form: FormState, opener: Arc<dyn FolderOpener>) -> Self {
        Self {
            form: Arc::new(Mutex::new(form)),
            opener,
        }
    }

    /// Lock the form state. A panic while holding the lock leaves the state
    /// usable, so poisoning is ignored.
    pub fn form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Form fields posted by Start
#[derive(Debug, Deserialize)]
pub struct ExtractForm {
    #[serde(default)]
    pub pdf_path: String,
    #[serde(default)]
    pub output_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub lang: String,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub field: Field,
    pub dir: Option<String>,
    /// Current field values, sent along when Browse is pressed on the form
    pub pdf_path: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub field: Field,
    pub path: String,
}

/// Request payload for the JSON extraction endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub pdf_path: String,
    /// Output base; blank or missing means `output`
    pub output_dir: Option<String>,
}

/// Response for the JSON extraction endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub image_count: usize,
    pub page_count: usize,
    pub run_dir: PathBuf,
    pub images_dir: PathBuf,
    pub texts_dir: PathBuf,
}

impl From<ExtractionResult> for ExtractResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            image_count: result.image_count,
            page_count: result.page_count,
            run_dir: result.layout.run_dir,
            images_dir: result.layout.images_dir,
            texts_dir: result.layout.texts_dir,
        }
    }
}

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("an extraction is already running")]
    Busy,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Extraction(#[from] pdf_harvest::HarvestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task failed: {0}")]
    Task(String),

    #[error("page rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl From<StateError> for AppError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Busy => AppError::Busy,
            invalid @ StateError::InvalidPath(_) => AppError::InvalidInput(invalid.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Busy => StatusCode::CONFLICT,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Io(_) | AppError::Task(_) | AppError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(error_response)).into_response()
    }
}

/// Build the application router with all routes configured
pub fn app(state: AppState) -> Router {
    Router::new()
        // Form
        .route("/", get(index))
        .route("/extract", post(start_extraction))
        .route("/dismiss", post(dismiss))
        .route("/language", post(switch_language))
        .route("/open-folder", post(open_folder))
        .route("/browse", get(browse_page))
        .route("/select", post(select_entry))
        // Scripting
        .route("/api/health", get(health_check))
        .route("/api/extract", post(extract_json))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(view::render_form(&state.form(), None)?))
}

type Outcome = Result<ExtractionResult, AppError>;

/// Run the default extractor on the blocking pool. `complete` records the
/// outcome in the form from inside the task, so the form leaves `Extracting`
/// even when the request that started the run is dropped.
fn spawn_extraction<F>(
    state: &AppState,
    request: ExtractionRequest,
    complete: F,
) -> JoinHandle<Outcome>
where
    F: FnOnce(&mut FormState, &Outcome) + Send + 'static,
{
    let form = Arc::clone(&state.form);
    tokio::task::spawn_blocking(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            Extractor::default().run(&request, LayoutStyle::Nested)
        }))
        .map_err(|_| AppError::Task("extraction panicked".to_string()))
        .and_then(|result| result.map_err(AppError::from));

        match &outcome {
            Ok(result) => tracing::info!(
                images = result.image_count,
                pages = result.page_count,
                run_dir = %result.layout.run_dir.display(),
                "extraction finished"
            ),
            Err(err) => tracing::warn!(%err, "extraction failed"),
        }

        complete(
            &mut form.lock().unwrap_or_else(PoisonError::into_inner),
            &outcome,
        );
        outcome
    })
}

fn summarize(outcome: &Outcome) -> Result<RunSummary, String> {
    outcome
        .as_ref()
        .map(RunSummary::from)
        .map_err(ToString::to_string)
}

pub async fn start_extraction(
    State(state): State<AppState>,
    Form(form): Form<ExtractForm>,
) -> Response {
    let request = {
        let mut guard = state.form();
        match guard.begin(&form.pdf_path, &form.output_dir) {
            Ok(request) => request,
            Err(StateError::Busy) => {
                let notice = guard.language.label(Label::Busy);
                return match view::render_form(&guard, Some(notice)) {
                    Ok(page) => (StatusCode::CONFLICT, Html(page)).into_response(),
                    Err(err) => AppError::from(err).into_response(),
                };
            }
            Err(err @ StateError::InvalidPath(_)) => {
                tracing::info!(%err, "rejected extraction request");
                return Redirect::to("/").into_response();
            }
        }
    };

    let task = spawn_extraction(&state, request, |form, outcome| {
        form.finish(summarize(outcome));
    });
    if let Err(err) = task.await {
        tracing::error!(%err, "extraction task did not complete");
    }
    Redirect::to("/").into_response()
}

pub async fn dismiss(State(state): State<AppState>) -> Redirect {
    state.form().dismiss();
    Redirect::to("/")
}

pub async fn switch_language(
    State(state): State<AppState>,
    Form(form): Form<LanguageForm>,
) -> Result<Redirect, AppError> {
    let language = Language::from_code(&form.lang)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown language: {}", form.lang)))?;
    state.form().language = language;
    Ok(Redirect::to("/"))
}

pub async fn open_folder(State(state): State<AppState>) -> Redirect {
    let target = state.form().last_run_dir.clone();
    match target {
        Some(run_dir) => {
            if let Err(err) = state.opener.open(&run_dir) {
                tracing::warn!(%err, run_dir = %run_dir.display(), "could not open folder");
                state.form().show_error(err.to_string());
            }
        }
        None => tracing::debug!("open folder requested before any successful run"),
    }
    Redirect::to("/")
}

pub async fn browse_page(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, AppError> {
    let (language, current) = {
        let mut guard = state.form();
        if !guard.is_busy() {
            if let Some(pdf_path) = &query.pdf_path {
                guard.pdf_path = pdf_path.trim().to_string();
            }
            if let Some(output_dir) = &query.output_dir {
                guard.output_dir = output_dir.trim().to_string();
            }
        }
        let current = match query.field {
            Field::Pdf => guard.pdf_path.clone(),
            Field::Output => guard.output_dir.clone(),
        };
        (guard.language, current)
    };

    let dir = match query.dir.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => browse::start_dir(&current),
    };
    let listing = browse::list_dir(&dir, query.field)?;
    Ok(Html(view::render_browser(language, query.field, &listing)?))
}

pub async fn select_entry(
    State(state): State<AppState>,
    Form(form): Form<SelectForm>,
) -> Redirect {
    let mut guard = state.form();
    if !guard.is_busy() {
        match form.field {
            Field::Pdf => guard.pdf_path = form.path,
            Field::Output => guard.output_dir = form.path,
        }
    }
    Redirect::to("/")
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pdf-harvest",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Same workflow as the form, answered as JSON. The run holds the form's busy
/// guard but leaves its fields and any open dialog as they were.
pub async fn extract_json(
    State(state): State<AppState>,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let request = ExtractionRequest::from_input(&payload.pdf_path, payload.output_dir.as_deref());
    if request.validate().is_err() {
        return Err(StateError::InvalidPath(request.pdf_path).into());
    }

    let previous = state.form().claim()?;
    let outcome = spawn_extraction(&state, request, move |form, outcome| {
        let run_dir = outcome.as_ref().ok().map(|result| result.layout.run_dir.clone());
        form.release(previous, run_dir);
    })
    .await
    .map_err(|err| AppError::Task(err.to_string()))?;

    Ok(Json(outcome?.into()))
}
