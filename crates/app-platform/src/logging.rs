//! Log subscriber setup

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (for example
/// `"barfly=info,app_core=debug"`) is used. Calling this more than once is
/// harmless: later calls leave the installed subscriber in place and return
/// `false`.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match fmt().with_env_filter(filter).with_target(true).try_init() {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "log subscriber already installed");
            false
        }
    }
}
