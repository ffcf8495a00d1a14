//! Console output for the command-line front ends

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::tty::IsTty;

/// What a console line is about; picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Banner,
    Progress,
    Success,
    Failure,
    Summary,
}

impl Tone {
    pub fn color(self) -> Color {
        match self {
            Tone::Banner | Tone::Summary => Color::Cyan,
            Tone::Progress => Color::Yellow,
            Tone::Success => Color::Green,
            Tone::Failure => Color::Red,
        }
    }
}

/// Writes report lines, colored or plain.
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Reporter<W> {
    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    pub fn colored(out: W) -> Self {
        Self { out, color: true }
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    pub fn line(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(tone.color()),
                Print(text),
                ResetColor,
                Print("\n")
            )?;
        } else {
            writeln!(self.out, "{text}")?;
        }
        self.out.flush()
    }

    /// Text without a trailing newline, for prompts.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Colors only when stdout is a terminal and `NO_COLOR` is unset.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && io::stdout().is_tty()
}
