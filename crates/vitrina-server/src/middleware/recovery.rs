//! Panic recovery and request timeout middleware.

use std::time::Duration;

use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;

/// Default whole-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Recovery middleware settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
pub struct RecoveryConfig {
    /// Whole-request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "request-timeout-secs",
            env = "REQUEST_TIMEOUT_SECS",
            default_value = "30"
        )
    )]
    pub request_timeout_secs: u64,
}

impl RecoveryConfig {
    /// Returns the request timeout as a [`Duration`].
    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Extension trait attaching panic recovery and request timeouts.
pub trait RouterRecoveryExt {
    /// Catches handler panics and bounds request duration.
    fn with_recovery(self, config: RecoveryConfig) -> Self;
}

impl RouterRecoveryExt for Router {
    fn with_recovery(self, config: RecoveryConfig) -> Self {
        self.layer(TimeoutLayer::new(config.request_timeout()))
            .layer(CatchPanicLayer::new())
    }
}
