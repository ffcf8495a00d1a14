use std::io;
use std::path::Path;
use std::process::Command;

/// Hands a folder (or URL) to the desktop.
pub trait FolderOpener: Send + Sync {
    fn open(&self, target: &Path) -> io::Result<()>;
}

/// Launches the platform file manager without waiting for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl FolderOpener for SystemOpener {
    fn open(&self, target: &Path) -> io::Result<()> {
        let program = opener_program(std::env::consts::OS);
        tracing::debug!(program, target = %target.display(), "opening");
        Command::new(program).arg(target).spawn()?;
        Ok(())
    }
}

/// `explorer` on Windows, `open` on macOS, `xdg-open` elsewhere.
pub fn opener_program(os: &str) -> &'static str {
    match os {
        "windows" => "explorer",
        "macos" => "open",
        _ => "xdg-open",
    }
}
