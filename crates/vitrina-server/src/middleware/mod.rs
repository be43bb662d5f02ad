//! HTTP middleware layers applied around the route tree.
//!
//! Exposed as router extension traits so the binary composes them in a
//! fixed order: security and observability around the routes, recovery
//! outermost.

mod observability;
mod recovery;
mod security;

pub use self::observability::RouterObservabilityExt;
pub use self::recovery::{RecoveryConfig, RouterRecoveryExt};
pub use self::security::{CorsConfig, RouterSecurityExt};
