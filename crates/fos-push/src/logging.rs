//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber for SDK logs.
///
/// `RUST_LOG` takes precedence; otherwise SDK crates log at `info` when
/// `enabled` and nothing at all when not. Safe to call more than once.
pub fn init(enabled: bool) {
    let default = if enabled {
        "fos_push=info,fos_push_net=info,fos_push_store=info"
    } else {
        "off"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
