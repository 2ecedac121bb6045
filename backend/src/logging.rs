//! Logging set-up. Library code only emits `tracing` events; the host calls
//! [`init_logging`] once at start-up to print them.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const FALLBACK_LEVEL: &str = "info";

/// Filter from `RUST_LOG`, else the configured level, else `info`
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Install the global subscriber. Returns false if one was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .try_init()
        .is_ok();
    if !installed {
        debug!("Logging already initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let config = LoggingConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config));
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "not a [valid directive".to_string(),
        };
        // Must not panic
        let _ = env_filter(&config);
    }
}
