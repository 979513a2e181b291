// Log setup for the binary.

use tracing_subscriber::EnvFilter;

/// Initialise logging. Without `debug` the level is pinned to `info`, even
/// if `RUST_LOG` happens to be set; with `debug` the default is `debug` and
/// `RUST_LOG` can narrow or widen it.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
