use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output shape of the process logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single lines for a terminal.
    Compact,
    /// One JSON object per event, carrying the enclosing session span's
    /// fields (such as the backend origin).
    Json,
}

/// Filter used when `RUST_LOG` is unset. HTTP client internals stay at
/// `warn` so request chatter does not drown the crate's own events.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "site_sync=debug,hyper=warn,reqwest=warn,info"
    } else {
        "site_sync=info,hyper=warn,reqwest=warn,warn"
    }
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(verbose)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .with_target(true),
            )
            .init(),
    }
}
