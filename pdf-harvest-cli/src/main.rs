use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pdf_harvest::{ExtractOptions, ExtractionRequest, LayoutStyle, DEFAULT_OUTPUT_BASE};
use pdf_harvest_cli::{harvest, init_tracing, Reporter};

#[derive(Parser)]
#[command(
    name = "pdfharvest",
    about = "Extract embedded images and per-page text from a PDF",
    version,
    author
)]
struct Cli {
    /// Input PDF file
    pdf: PathBuf,

    /// Directory that receives the run_<timestamp> folder
    #[arg(short, long, default_value = DEFAULT_OUTPUT_BASE)]
    output: PathBuf,

    /// Log every file written to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Fail when the image and text passes disagree on the page count
    #[arg(long)]
    strict_pages: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let request = ExtractionRequest::new(cli.pdf).with_output_base(cli.output);
    let options = ExtractOptions {
        strict_page_count: cli.strict_pages,
    };
    let mut reporter = Reporter::plain(io::stdout().lock());

    harvest(&request, LayoutStyle::Flat, options, &mut reporter)?;
    Ok(())
}
