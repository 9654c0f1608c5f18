//! Tracing setup for the relay binary.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ServerConfig};

static INIT: Once = Once::new();

const FALLBACK_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(config: &ServerConfig) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.log_level));

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match config.log_format {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        };

        // Another subscriber (a test harness) may already be installed.
        if let Err(err) = result {
            eprintln!("tracing subscriber not installed: {}", err);
        }
    });
}

/// Parses `log_level`, falling back to `info` when it is not a valid filter.
fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|err| {
        eprintln!("invalid log level {:?}: {}; using {}", log_level, err, FALLBACK_FILTER);
        EnvFilter::new(FALLBACK_FILTER)
    })
}
