use std::io;

use anyhow::Result;
use clap::Parser;
use pdf_harvest_cli::{color_enabled, init_tracing, prompt_and_harvest, Reporter};

/// Asks for a PDF path and extracts into output/extract_<timestamp>.
#[derive(Parser)]
#[command(name = "pdfharvest-prompt", version, author)]
struct Cli {}

fn main() -> Result<()> {
    Cli::parse();
    init_tracing(false);

    let stdout = io::stdout().lock();
    let mut reporter = if color_enabled() {
        Reporter::colored(stdout)
    } else {
        Reporter::plain(stdout)
    };

    let result = prompt_and_harvest(&mut io::stdin().lock(), &mut reporter)?;
    if result.is_some() {
        reporter.blank()?;
    }
    Ok(())
}
