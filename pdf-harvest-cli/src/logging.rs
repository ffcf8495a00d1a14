use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "pdf_harvest=debug,pdf_harvest_cli=debug"
    } else {
        "pdf_harvest=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
