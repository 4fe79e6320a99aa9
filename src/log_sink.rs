// log_sink.rs
// Purpose: install the process-wide tracing subscriber

use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive: `RUST_LOG` when set, otherwise the configured level.
pub fn filter_for(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the fmt subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_level: &str) {
    let _ = fmt()
        .with_env_filter(filter_for(default_level))
        .with_target(false)
        .try_init();
}
