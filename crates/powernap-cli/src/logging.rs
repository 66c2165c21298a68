//! Subscriber setup for the powernap binary.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber, writing to stderr or to a log file.
///
/// `RUST_LOG` overrides the computed filter. The HTTP stack's own logging is
/// floored at WARN either way; its connection chatter drowns the monitor's
/// one-line-per-tick output otherwise.
///
/// Returns the appender guard when logging to a file; the caller must hold it
/// for the lifetime of the process or buffered lines are lost on exit.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init(debug: bool, log_path: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let default_filter = if debug {
        "debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"
    } else {
        "info,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match log_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
