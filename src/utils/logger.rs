use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// Diagnostics always go to stderr so command output on stdout stays stable.
/// `RUST_LOG` wins when set; otherwise `--verbose` turns on debug output for this crate.
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,pi_openclaw=debug,pi=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    // try_init: a second call (e.g. from tests) must not panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false) // Don't show module paths
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init();
}
