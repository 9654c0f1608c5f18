//! Message batching configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Debounce and flush settings
#[derive(Debug, Clone, Deserialize)]
pub struct BatchingConfig {
    /// Quiet period before a user's batch is flushed; 0 disables coalescing
    #[serde(default = "default_debounce")]
    pub debounce_secs: u64,

    /// Bound on each generate / deliver / persist call during a flush
    #[serde(default = "default_downstream_timeout")]
    pub downstream_timeout_secs: u64,
}

impl BatchingConfig {
    /// Get debounce window as Duration
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    /// Get downstream timeout as Duration
    pub fn downstream_timeout(&self) -> Duration {
        Duration::from_secs(self.downstream_timeout_secs)
    }

    /// Validate batching configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.downstream_timeout_secs == 0 || self.downstream_timeout_secs > 300 {
            return Err(ValidationError::InvalidDownstreamTimeout);
        }
        Ok(())
    }
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce(),
            downstream_timeout_secs: default_downstream_timeout(),
        }
    }
}

fn default_debounce() -> u64 {
    10
}

fn default_downstream_timeout() -> u64 {
    30
}
