//! Service configuration, state, and supporting services.

mod config;
mod error;
mod health;
mod state;

pub use self::config::{ServiceConfig, VectorBackend};
pub use self::error::{Result, ServiceError, ServiceErrorKind};
pub use self::health::HealthService;
pub use self::state::ServiceState;

/// Tracing target for service wiring.
pub(crate) const TRACING_TARGET: &str = "vitrina_server::service";
