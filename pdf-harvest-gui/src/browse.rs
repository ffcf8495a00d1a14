//! Server-side directory listing behind the Browse buttons

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Form field a listing fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Pdf,
    Output,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Pdf => "pdf",
            Field::Output => "output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub dir: PathBuf,
    pub parent: Option<PathBuf>,
    /// Folders first, then files, each sorted by name
    pub entries: Vec<Entry>,
}

/// List `dir` for `field`: folders always, `.pdf` files only for the PDF
/// field. Hidden entries are skipped.
pub fn list_dir(dir: &Path, field: Field) -> io::Result<Listing> {
    let dir = dir.canonicalize()?;
    let mut entries = Vec::new();

    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let is_dir = path.is_dir();
        if is_dir || (field == Field::Pdf && is_pdf(&path)) {
            entries.push(Entry { name, path, is_dir });
        }
    }

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(Listing {
        parent: dir.parent().map(Path::to_path_buf),
        dir,
        entries,
    })
}

fn is_pdf(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
}

/// Where a listing starts: the field's folder, the folder of the field's
/// file, or the working directory.
pub fn start_dir(current_value: &str) -> PathBuf {
    let value = Path::new(current_value.trim());
    if !value.as_os_str().is_empty() {
        if value.is_dir() {
            return value.to_path_buf();
        }
        if let Some(parent) = value.parent().filter(|parent| parent.is_dir()) {
            return parent.to_path_buf();
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
