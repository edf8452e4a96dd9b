//! Structured log output for the worker.
//!
//! Handlers log through `tracing` with per-task spans. This module installs
//! the process-wide subscriber once the configuration is known.

use crate::config::LogConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over [`LogConfig::filter`]. An invalid filter
/// falls back to `info`. Returns `false` when a global subscriber was
/// already installed; the existing one is kept.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = config.json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!config.json).then(|| fmt::layer().with_target(true).with_writer(std::io::stderr));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(json = config.json, "structured logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_installation_is_rejected() {
        let config = LogConfig::default();

        init_logging(&config);

        assert!(!init_logging(&config));
    }
}
