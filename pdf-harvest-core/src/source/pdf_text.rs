//! Page text backed by pdf-extract

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Once;

use pdf_extract::{Document, OutputError, PlainTextOutput};

use super::{PageText, TextSource};
use crate::error::Result;

/// Text source over `pdf_extract`'s plain-text layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractTextSource;

impl TextSource for PdfExtractTextSource {
    fn visit_pages(
        &self,
        pdf_path: &Path,
        visit: &mut dyn FnMut(PageText) -> Result<()>,
    ) -> Result<()> {
        let mut document = Document::load(pdf_path)?;
        if document.is_encrypted() {
            document.decrypt("")?;
        }

        let pages = document.get_pages().into_keys();
        visit_rendered(pages, |page| render_page(&document, page), visit)
    }
}

fn render_page(document: &Document, page: u32) -> std::result::Result<String, OutputError> {
    let mut text = String::new();
    {
        let mut output = PlainTextOutput::new(&mut text);
        pdf_extract::output_doc_page(document, &mut output, page)?;
    }
    Ok(text)
}

/// Render each page with `render` and hand the text to `visit`. pdf-extract
/// unwraps on content it cannot handle, so a panic means "no text" for that
/// page rather than a failed run.
fn visit_rendered<R>(
    pages: impl IntoIterator<Item = u32>,
    mut render: R,
    visit: &mut dyn FnMut(PageText) -> Result<()>,
) -> Result<()>
where
    R: FnMut(u32) -> std::result::Result<String, OutputError>,
{
    for page in pages {
        let rendered = silence_panics(|| panic::catch_unwind(AssertUnwindSafe(|| render(page))));

        let text = match rendered {
            Ok(Ok(text)) if text.is_empty() => None,
            Ok(Ok(text)) => Some(text),
            Ok(Err(err)) => return Err(err.into()),
            Err(payload) => {
                tracing::warn!(
                    page,
                    reason = panic_reason(payload.as_ref()),
                    "text layout failed, page written empty"
                );
                None
            }
        };
        visit(PageText { page, text })?;
    }
    Ok(())
}

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

/// Resets the silenced flag to what it was before.
struct SilenceGuard(bool);

impl Drop for SilenceGuard {
    fn drop(&mut self) {
        let previous = self.0;
        SILENCED.with(|flag| flag.set(previous));
    }
}

/// Run `f` with the panic hook muted on the current thread. The recovered
/// panic is already logged through tracing; other threads keep the hook that
/// was installed before.
fn silence_panics<T>(f: impl FnOnce() -> T) -> T {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });

    let _guard = SilenceGuard(SILENCED.with(|flag| flag.replace(true)));
    f()
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason
    } else {
        "unknown"
    }
}
