use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pdf_harvest::DEFAULT_OUTPUT_BASE;
use pdf_harvest_gui::{app, AppState, FolderOpener, FormState, Language, SystemOpener};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pdfharvest-gui",
    about = "Serve the pdf-harvest form on localhost",
    version,
    author
)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:7878")]
    addr: SocketAddr,

    /// Initial output folder
    #[arg(short, long, default_value = DEFAULT_OUTPUT_BASE)]
    output: String,

    /// Label language (en or ar)
    #[arg(long, default_value = "en", value_parser = parse_language)]
    lang: Language,

    /// Do not open the form in a browser
    #[arg(long)]
    no_browser: bool,
}

fn parse_language(code: &str) -> Result<Language, String> {
    Language::from_code(code).ok_or_else(|| format!("unsupported language '{code}' (use en or ar)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pdf_harvest=info,pdf_harvest_gui=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opener = Arc::new(SystemOpener);
    let state = AppState::new(FormState::new(cli.lang, cli.output), opener.clone());

    let listener = tokio::net::TcpListener::bind(cli.addr)
        .await
        .with_context(|| format!("could not listen on {}", cli.addr))?;
    let url = format!("http://{}/", listener.local_addr()?);

    info!("pdf-harvest form listening on {url}");

    if !cli.no_browser {
        if let Err(err) = opener.open(Path::new(&url)) {
            tracing::warn!(%err, "could not open a browser, visit {url} manually");
        }
    }

    axum::serve(listener, app(state)).await?;
    Ok(())
}
