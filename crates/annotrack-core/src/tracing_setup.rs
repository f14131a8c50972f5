//! Process-wide tracing subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Install the global fmt subscriber. `RUST_LOG` overrides `config.log_level`.
///
/// Returns `false` when a subscriber was already installed (e.g. by a test
/// harness or the embedding application); that is not an error.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json_logs {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.log_level, json = config.json_logs, "tracing initialized");
    }
    installed
}
