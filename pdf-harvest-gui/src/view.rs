//! Server-rendered pages
//!
//! Plain HTML forms only; every button posts back to the server, which keeps
//! the [`FormState`] as the single source of truth. Pages are handlebars
//! templates, so every value is HTML-escaped unless a template uses `{{{ }}}`.

use handlebars::{Handlebars, RenderError};
use serde_json::{json, Value};

use crate::browse::{Field, Listing};
use crate::i18n::{Label, Language};
use crate::state::{FormState, Phase};

const STYLE: &str = "\
body{font-family:Arial,sans-serif;max-width:560px;margin:24px auto;color:#222}\
nav{display:flex;gap:6px;justify-content:flex-end;font-size:13px}\
label{display:block;font-size:16px;margin:14px 0 4px}\
input[type=text]{width:100%;box-sizing:border-box;padding:4px}\
.start{background:#4CAF50;color:#fff;font-size:16px;margin-top:18px;padding:6px 14px}\
.open{background:#2196F3;color:#fff;margin-top:8px}\
.open:disabled{background:#9ec9ef}\
.notice{color:#a15c00}\
footer{color:gray;text-align:center;margin-top:32px;font-size:13px}\
.overlay{position:fixed;inset:0;background:rgba(0,0,0,.35);display:flex;align-items:center;justify-content:center}\
.dialog{background:#fff;padding:18px 24px;min-width:300px;border-radius:4px}\
ul.listing{list-style:none;padding:0}ul.listing form{margin:2px 0}";

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="{{code}}" dir="{{dir}}">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
{{#if refresh}}<meta http-equiv="refresh" content="2">
{{/if}}<style>{{{style}}}</style>
</head>
<body>
<nav><form method="post" action="/language"><span>{{menu}}</span>{{#each languages}} <button name="lang" value="{{code}}"{{#if current}} disabled{{/if}}>{{name}}</button>{{/each}}</form></nav>
{{{body}}}<footer>{{footer}}</footer>
</body>
</html>
"#;

const FORM: &str = r#"<main>
<form method="post" action="/extract">
<label for="pdf_path">{{labels.select_pdf}}</label>
<input type="text" id="pdf_path" name="pdf_path" value="{{pdf_path}}">
<button formmethod="get" formaction="/browse" name="field" value="pdf">{{labels.browse}}</button>
<label for="output_dir">{{labels.select_output}}</label>
<input type="text" id="output_dir" name="output_dir" value="{{output_dir}}">
<button formmethod="get" formaction="/browse" name="field" value="output">{{labels.browse}}</button>
<div><button class="start" type="submit"{{#if busy}} disabled{{/if}}>{{labels.start}}</button></div>
</form>
<form method="post" action="/open-folder"><button class="open"{{#unless can_open}} disabled{{/unless}}>{{labels.open_folder}}</button></form>
{{#if busy}}<p class="notice">{{labels.extracting}}</p>
{{/if}}{{#if notice}}<p class="notice">{{notice}}</p>
{{/if}}</main>
{{#if result}}<div class="overlay"><div class="dialog" role="dialog" aria-modal="true"><h2>{{labels.success}}</h2><p>{{labels.images}}: {{result.image_count}}</p><p>{{labels.texts}}: {{result.page_count}}</p><p>{{labels.saved}}: <code>{{result.run_dir}}</code></p><form method="post" action="/dismiss"><button autofocus>{{labels.ok}}</button></form></div></div>
{{/if}}{{#if error}}<div class="overlay"><div class="dialog" role="alertdialog" aria-modal="true"><h2>{{labels.error}}</h2><p class="error">{{error}}</p><form method="post" action="/dismiss"><button autofocus>{{labels.ok}}</button></form></div></div>
{{/if}}"#;

const BROWSER: &str = r#"<main>
<h2><code>{{dir}}</code></h2>
{{#if parent}}<form method="get" action="/browse"><input type="hidden" name="field" value="{{field}}"><input type="hidden" name="dir" value="{{parent}}"><button>⬆ {{labels.parent}}</button></form>
{{/if}}<ul class="listing">
{{#each entries}}{{#if is_dir}}<li><form method="get" action="/browse"><input type="hidden" name="field" value="{{@root.field}}"><input type="hidden" name="dir" value="{{path}}"><button>📁 {{name}}</button></form></li>
{{else}}<li><form method="post" action="/select"><input type="hidden" name="field" value="{{@root.field}}"><input type="hidden" name="path" value="{{path}}"><button>📄 {{name}}</button></form></li>
{{/if}}{{/each}}</ul>
{{#if pick_folder}}<form method="post" action="/select"><input type="hidden" name="field" value="{{field}}"><input type="hidden" name="path" value="{{dir}}"><button>{{labels.use_folder}}</button></form>
{{/if}}<p><a href="/">{{labels.cancel}}</a></p>
</main>
"#;

fn render(template: &str, data: &Value) -> Result<String, RenderError> {
    Handlebars::new().render_template(template, data)
}

fn page(lang: Language, refresh: bool, body: &str) -> Result<String, RenderError> {
    let languages: Vec<Value> = Language::ALL
        .into_iter()
        .map(|other| {
            json!({
                "code": other.code(),
                "name": other.native_name(),
                "current": other == lang,
            })
        })
        .collect();

    render(
        PAGE,
        &json!({
            "code": lang.code(),
            "dir": lang.direction(),
            "title": lang.label(Label::Title),
            "menu": lang.label(Label::MenuLanguage),
            "footer": lang.label(Label::Developed),
            "refresh": refresh,
            "style": STYLE,
            "languages": languages,
            "body": body,
        }),
    )
}

/// The main form, with the dialog for the current phase on top.
pub fn render_form(state: &FormState, notice: Option<&str>) -> Result<String, RenderError> {
    let lang = state.language;
    let busy = state.is_busy();

    let result = match &state.phase {
        Phase::ResultShown(summary) => json!({
            "image_count": summary.image_count,
            "page_count": summary.page_count,
            "run_dir": summary.run_dir.display().to_string(),
        }),
        _ => Value::Null,
    };
    let error = match &state.phase {
        Phase::ErrorShown(message) => Value::from(message.as_str()),
        _ => Value::Null,
    };

    let body = render(
        FORM,
        &json!({
            "labels": {
                "select_pdf": lang.label(Label::SelectPdf),
                "select_output": lang.label(Label::SelectOutput),
                "browse": lang.label(Label::Browse),
                "start": lang.label(Label::Start),
                "open_folder": lang.label(Label::OpenFolder),
                "extracting": lang.label(Label::Extracting),
                "success": lang.label(Label::Success),
                "images": lang.label(Label::Images),
                "texts": lang.label(Label::Texts),
                "saved": lang.label(Label::Saved),
                "error": lang.label(Label::Error),
                "ok": lang.label(Label::Ok),
            },
            "pdf_path": state.pdf_path,
            "output_dir": state.output_dir,
            "busy": busy,
            "can_open": state.can_open_folder(),
            "notice": notice,
            "result": result,
            "error": error,
        }),
    )?;
    page(lang, busy, &body)
}

/// Directory listing that fills `field` when an entry is chosen.
pub fn render_browser(
    lang: Language,
    field: Field,
    listing: &Listing,
) -> Result<String, RenderError> {
    let entries: Vec<Value> = listing
        .entries
        .iter()
        .map(|entry| {
            json!({
                "name": entry.name,
                "path": entry.path.display().to_string(),
                "is_dir": entry.is_dir,
            })
        })
        .collect();

    let body = render(
        BROWSER,
        &json!({
            "labels": {
                "parent": lang.label(Label::ParentFolder),
                "use_folder": lang.label(Label::UseFolder),
                "cancel": lang.label(Label::Cancel),
            },
            "field": field.as_str(),
            "dir": listing.dir.display().to_string(),
            "parent": listing.parent.as_ref().map(|parent| parent.display().to_string()),
            "entries": entries,
            "pick_folder": field == Field::Output,
        }),
    )?;
    page(lang, false, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::Entry;
    use crate::state::RunSummary;
    use std::path::PathBuf;

    #[test]
    fn test_field_values_are_escaped() {
        let mut state = FormState::new(Language::English, "a\"b");
        state.pdf_path = "<script>&".to_string();
        let html = render_form(&state, None).unwrap();

        assert!(html.contains("value=\"&lt;script&gt;&amp;\""));
        assert!(html.contains("value=\"a&quot;b\""));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_idle_form_has_fields_and_disabled_open_folder() {
        let mut state = FormState::new(Language::English, "output");
        state.pdf_path = "/tmp/<odd>.pdf".to_string();
        let html = render_form(&state, None).unwrap();

        assert!(html.contains("<html lang=\"en\" dir=\"ltr\">"));
        assert!(html.contains("value=\"/tmp/&lt;odd&gt;.pdf\""));
        assert!(html.contains("value=\"output\""));
        assert!(html.contains("<button class=\"open\" disabled>"));
        assert!(!html.contains("class=\"overlay\""));
        assert!(html.contains("Built with pdf-harvest"));
    }

    #[test]
    fn test_arabic_form_is_rtl() {
        let state = FormState::new(Language::Arabic, "output");
        let html = render_form(&state, None).unwrap();
        assert!(html.contains("<html lang=\"ar\" dir=\"rtl\">"));
        assert!(html.contains("بدء الاستخراج"));
    }

    #[test]
    fn test_result_dialog() {
        let mut state = FormState::new(Language::English, "output");
        state.phase = Phase::Extracting;
        state.finish(Ok(RunSummary {
            image_count: 4,
            page_count: 9,
            run_dir: PathBuf::from("output/extract_20250101_120000"),
        }));
        let html = render_form(&state, None).unwrap();

        assert!(html.contains("Images extracted: 4"));
        assert!(html.contains("Text pages extracted: 9"));
        assert!(html.contains("output/extract_20250101_120000"));
        assert!(html.contains("<button class=\"open\">"));
    }

    #[test]
    fn test_extracting_disables_start_and_refreshes() {
        let mut state = FormState::new(Language::English, "output");
        state.phase = Phase::Extracting;
        let html = render_form(&state, Some("An extraction is already running.")).unwrap();

        assert!(html.contains("type=\"submit\" disabled"));
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains("An extraction is already running."));
    }

    #[test]
    fn test_browser_lists_entries() {
        let listing = Listing {
            dir: PathBuf::from("/data"),
            parent: Some(PathBuf::from("/")),
            entries: vec![
                Entry {
                    name: "scans".into(),
                    path: PathBuf::from("/data/scans"),
                    is_dir: true,
                },
                Entry {
                    name: "a&b.pdf".into(),
                    path: PathBuf::from("/data/a&b.pdf"),
                    is_dir: false,
                },
            ],
        };

        let html = render_browser(Language::English, Field::Pdf, &listing).unwrap();
        assert!(html.contains("value=\"/data/scans\""));
        assert!(html.contains("📄 a&amp;b.pdf"));
        assert!(!html.contains("Use this folder"));

        let html = render_browser(Language::English, Field::Output, &listing).unwrap();
        assert!(html.contains("Use this folder"));
    }
}
