use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter, Registry};

/// What we log when `RUST_LOG` says nothing.  Per-request chatter stays quiet
/// unless asked for; query failures still show up.
const DEFAULT_FILTER: &str = "ninja_browse=warn";

/// Initialize logging to stderr.  If the environment variable `RUST_LOG` is
/// set to a non-empty value it is used as the filter, otherwise only warnings
/// from this crate are shown.  Calling this more than once is harmless.
pub fn init_logging() {
    let env_filter = match std::env::var("RUST_LOG") {
        // An empty RUST_LOG is treated the same as an unset one; shell
        // wrappers frequently export it unconditionally.
        Ok(rustlog) if !rustlog.is_empty() => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        _ => EnvFilter::new(DEFAULT_FILTER),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .compact()
        // The output lands in a terminal next to the "server running" line
        // or in a captured log, neither of which wants ANSI or wall time.
        .with_ansi(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    // A global subscriber may already be installed (tests, embedding); keep
    // the existing one in that case.
    let _ = Registry::default().with(layer).try_init();
}
