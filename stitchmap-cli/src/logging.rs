//! Process-wide log output for the `stitchmap` binary.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatting subscriber on stderr.
///
/// Library crates log through the `log` facade; those records are bridged
/// into the same subscriber. Calling this twice is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        // The subscriber already in place receives this.
        debug!("keeping existing log subscriber: {err}");
    }
}
