//! Route tests for the pdf-harvest form

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use pdf_harvest_gui::{
    app, AppState, ErrorResponse, ExtractResponse, FolderOpener, FormState, Language, Phase,
};
use pdf_harvest_test_suite::utils::{create_test_output_dir, two_page_report};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::util::ServiceExt;

/// Remembers what it was asked to open.
#[derive(Default)]
struct RecordingOpener {
    opened: Mutex<Vec<PathBuf>>,
}

impl FolderOpener for RecordingOpener {
    fn open(&self, target: &Path) -> io::Result<()> {
        self.opened
            .lock()
            .unwrap()
            .push(target.to_path_buf());
        Ok(())
    }
}

struct FailingOpener;

impl FolderOpener for FailingOpener {
    fn open(&self, _target: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no file manager"))
    }
}

fn test_state(output_dir: &Path) -> (AppState, Arc<RecordingOpener>) {
    let opener = Arc::new(RecordingOpener::default());
    let state = AppState::new(
        FormState::new(Language::English, output_dir.display().to_string()),
        opener.clone(),
    );
    (state, opener)
}

/// Percent-encode a form value.
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

async fn get(state: &AppState, uri: &str) -> Response {
    app(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(state: &AppState, uri: &str, fields: &[(&str, &str)]) -> Response {
    let body = fields
        .iter()
        .map(|(name, value)| format!("{name}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_json(state: &AppState, uri: &str, payload: serde_json::Value) -> Response {
    app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_redirects_home(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_health_check() {
    let temp_dir = create_test_output_dir().unwrap();
    let (state, _) = test_state(temp_dir.path());

    let response = get(&state, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "pdf-harvest");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_index_renders_form() {
    let temp_dir = create_test_output_dir().unwrap();
    let (state, _) = test_state(temp_dir.path());

    let response = get(&state, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("PDF File Path:"));
    assert!(html.contains("Start Extraction"));
    assert!(html.contains("<button class=\"open\" disabled>"));
}

#[tokio::test]
async fn test_language_switch() {
    let temp_dir = create_test_output_dir().unwrap();
    let (state, _) = test_state(temp_dir.path());

    let response = post_form(&state, "/language", &[("lang", "ar")]).await;
    assert_redirects_home(&response);
    assert_eq!(state.form().language, Language::Arabic);

    let html = body_text(get(&state, "/").await).await;
    assert!(html.contains("dir=\"rtl\""));
    assert!(html.contains("استعراض"));

    let response = post_form(&state, "/language", &[("lang", "fr")]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.form().language, Language::Arabic);
}

#[tokio::test]
async fn test_invalid_path_shows_error_dialog_until_dismissed() {
    let temp_dir = create_test_output_dir().unwrap();
    let out = temp_dir.path().join("out");
    let (state, _) = test_state(&out);
    let missing = temp_dir.path().join("missing.pdf");

    let response = post_form(
        &state,
        "/extract",
        &[("pdf_path", missing.to_str().unwrap()), ("output_dir", "")],
    )
    .await;
    assert_redirects_home(&response);
    assert_eq!(
        state.form().phase,
        Phase::ErrorShown("PDF file path is invalid.".to_string())
    );
    assert!(!out.exists());

    let html = body_text(get(&state, "/").await).await;
    assert!(html.contains("role=\"alertdialog\""));
    assert!(html.contains("PDF file path is invalid."));

    assert_redirects_home(&post_form(&state, "/dismiss", &[]).await);
    assert_eq!(state.form().phase, Phase::Idle);
}

#[tokio::test]
async fn test_extraction_then_open_folder() {
    let temp_dir = create_test_output_dir().unwrap();
    let (pdf, _) = two_page_report(temp_dir.path()).unwrap();
    let out = temp_dir.path().join("exports");
    let (state, opener) = test_state(&out);

    let response = post_form(
        &state,
        "/extract",
        &[
            ("pdf_path", pdf.to_str().unwrap()),
            ("output_dir", out.to_str().unwrap()),
        ],
    )
    .await;
    assert_redirects_home(&response);

    let run_dir = match state.form().phase.clone() {
        Phase::ResultShown(summary) => {
            assert_eq!(summary.image_count, 1);
            assert_eq!(summary.page_count, 2);
            summary.run_dir
        }
        other => panic!("expected result dialog, got {other:?}"),
    };
    assert!(run_dir.starts_with(&out));
    assert!(run_dir.join("images").join("image_p1_1.jpg").is_file());
    assert!(run_dir.join("texts").join("text_page_2.txt").is_file());

    let html = body_text(get(&state, "/").await).await;
    assert!(html.contains("Images extracted: 1"));
    assert!(html.contains("Text pages extracted: 2"));
    assert!(html.contains("<button class=\"open\">"));

    assert_redirects_home(&post_form(&state, "/dismiss", &[]).await);
    assert_redirects_home(&post_form(&state, "/open-folder", &[]).await);
    assert_eq!(*opener.opened.lock().unwrap(), vec![run_dir]);
}

#[tokio::test]
async fn test_open_folder_failure_is_shown() {
    let temp_dir = create_test_output_dir().unwrap();
    let state = AppState::new(
        FormState::new(Language::English, "output"),
        Arc::new(FailingOpener),
    );
    state.form().last_run_dir = Some(temp_dir.path().to_path_buf());

    assert_redirects_home(&post_form(&state, "/open-folder", &[]).await);
    assert_eq!(
        state.form().phase,
        Phase::ErrorShown("no file manager".to_string())
    );
}

#[tokio::test]
async fn test_open_folder_before_any_run_does_nothing() {
    let temp_dir = create_test_output_dir().unwrap();
    let (state, opener) = test_state(temp_dir.path());

    assert_redirects_home(&post_form(&state, "/open-folder", &[]).await);
    assert!(opener.opened.lock().unwrap().is_empty());
    assert_eq!(state.form().phase, Phase::Idle);
}

#[tokio::test]
async fn test_start_while_extracting_is_refused() {
    let temp_dir = create_test_output_dir().unwrap();
    let (pdf, _) = two_page_report(temp_dir.path()).unwrap();
    let (state, _) = test_state(temp_dir.path());
    {
        let mut form = state.form();
        form.pdf_path = "first.pdf".to_string();
        form.phase = Phase::Extracting;
    }

    let response = post_form(
        &state,
        "/extract",
        &[("pdf_path", pdf.to_str().unwrap()), ("output_dir", "")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response)
        .await
        .contains("An extraction is already running."));

    let response = post_json(
        &state,
        "/api/extract",
        json!({ "pdf_path": pdf.to_str().unwrap() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let form = state.form();
    assert_eq!(form.phase, Phase::Extracting);
    assert_eq!(form.pdf_path, "first.pdf");
}

#[tokio::test]
async fn test_json_extraction() {
    let temp_dir = create_test_output_dir().unwrap();
    let (pdf, _) = two_page_report(temp_dir.path()).unwrap();
    let out = temp_dir.path().join("api-out");
    let (state, _) = test_state(temp_dir.path());

    let response = post_json(
        &state,
        "/api/extract",
        json!({ "pdf_path": pdf.to_str().unwrap(), "output_dir": out.to_str().unwrap() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let result: ExtractResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(result.image_count, 1);
    assert_eq!(result.page_count, 2);
    assert!(result.run_dir.starts_with(&out));
    assert_eq!(result.images_dir, result.run_dir.join("images"));

    let form = state.form();
    assert_eq!(form.phase, Phase::Idle);
    assert_eq!(form.last_run_dir.as_ref(), Some(&result.run_dir));
}

#[tokio::test]
async fn test_json_extraction_invalid_path() {
    let temp_dir = create_test_output_dir().unwrap();
    let (state, _) = test_state(temp_dir.path());

    let response = post_json(
        &state,
        "/api/extract",
        json!({ "pdf_path": "/nowhere/at/all.pdf" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(error.error.contains("/nowhere/at/all.pdf"));
    assert_eq!(state.form().phase, Phase::Idle);
}

#[tokio::test]
async fn test_browse_and_select_pdf() {
    let temp_dir = create_test_output_dir().unwrap();
    let (pdf, _) = two_page_report(temp_dir.path()).unwrap();
    std::fs::create_dir(temp_dir.path().join("scans")).unwrap();
    std::fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();
    let (state, _) = test_state(temp_dir.path());

    let uri = format!(
        "/browse?field=pdf&pdf_path=&output_dir=keep-me&dir={}",
        encode(temp_dir.path().to_str().unwrap())
    );
    let response = get(&state, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("📁 scans"));
    assert!(html.contains("📄 report.pdf"));
    assert!(!html.contains("notes.txt"));
    assert_eq!(state.form().output_dir, "keep-me");

    let canonical = pdf.canonicalize().unwrap();
    let response = post_form(
        &state,
        "/select",
        &[("field", "pdf"), ("path", canonical.to_str().unwrap())],
    )
    .await;
    assert_redirects_home(&response);
    assert_eq!(state.form().pdf_path, canonical.display().to_string());
}

#[tokio::test]
async fn test_browse_missing_dir() {
    let temp_dir = create_test_output_dir().unwrap();
    let (state, _) = test_state(temp_dir.path());
    let missing = temp_dir.path().join("gone");

    let uri = format!("/browse?field=output&dir={}", encode(missing.to_str().unwrap()));
    let response = get(&state, &uri).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// Wait until the form leaves `Extracting`, for runs nobody awaits.
async fn wait_until_idle_or_shown(state: &AppState) {
    for _ in 0..200 {
        if !state.form().is_busy() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }
    panic!("form stayed in Extracting");
}

#[tokio::test]
async fn test_dropped_request_still_finishes_extraction() {
    let temp_dir = create_test_output_dir().unwrap();
    let (pdf, _) = two_page_report(temp_dir.path()).unwrap();
    let out = temp_dir.path().join("exports");
    let (state, _) = test_state(&out);
    let fields = [
        ("pdf_path", pdf.to_str().unwrap()),
        ("output_dir", out.to_str().unwrap()),
    ];

    // Poll the request once so the run starts, then drop it the way a closed
    // browser tab would.
    {
        let pending = post_form(&state, "/extract", &fields);
        tokio::pin!(pending);
        tokio::select! {
            biased;
            _ = &mut pending => {}
            _ = tokio::task::yield_now() => {}
        }
    }
    assert_ne!(state.form().phase, Phase::Idle);

    wait_until_idle_or_shown(&state).await;
    assert!(matches!(state.form().phase, Phase::ResultShown(_)));

    let response = post_form(&state, "/extract", &fields).await;
    assert_redirects_home(&response);
    assert!(matches!(state.form().phase, Phase::ResultShown(_)));
}

#[tokio::test]
async fn test_json_extraction_leaves_form_untouched() {
    let temp_dir = create_test_output_dir().unwrap();
    let (pdf, _) = two_page_report(temp_dir.path()).unwrap();
    let out = temp_dir.path().join("api-out");
    let (state, _) = test_state(temp_dir.path());
    {
        let mut form = state.form();
        form.pdf_path = "operator.pdf".to_string();
        form.output_dir = "operator-out".to_string();
        form.phase = Phase::ErrorShown("PDF file path is invalid.".to_string());
    }

    let response = post_json(
        &state,
        "/api/extract",
        json!({ "pdf_path": pdf.to_str().unwrap(), "output_dir": out.to_str().unwrap() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let result: ExtractResponse = serde_json::from_str(&body_text(response).await).unwrap();

    let form = state.form();
    assert_eq!(form.pdf_path, "operator.pdf");
    assert_eq!(form.output_dir, "operator-out");
    assert_eq!(
        form.phase,
        Phase::ErrorShown("PDF file path is invalid.".to_string())
    );
    assert_eq!(form.last_run_dir.as_ref(), Some(&result.run_dir));
}
