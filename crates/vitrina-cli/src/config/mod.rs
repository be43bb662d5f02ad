//! CLI configuration management.
//!
//! The complete configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── service: ServiceConfig       # Stores (Postgres/Qdrant/memory), engine defaults
//! ├── middleware: MiddlewareConfig # CORS, recovery/timeouts
//! └── server: ServerConfig         # Host, port, shutdown
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod server;

use clap::Parser;
use serde::{Deserialize, Serialize};
use vitrina_server::middleware::{CorsConfig, RecoveryConfig};
use vitrina_server::service::ServiceConfig;

pub use self::server::ServerConfig;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "vitrina")]
#[command(about = "Vitrina product recommendation server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Store connections and recommendation defaults.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// HTTP middleware configuration.
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,
}

/// HTTP middleware configuration.
#[derive(Debug, Clone, Default, clap::Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS settings.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Panic recovery and timeout settings.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_arguments_are_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_with_defaults() {
        let cli = Cli::parse_from(["vitrina"]);
        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.middleware.recovery.request_timeout_secs, 30);
    }

    #[test]
    fn parses_backend_override() {
        let cli = Cli::parse_from(["vitrina", "--vector-backend", "memory"]);
        assert_eq!(
            cli.service.vector_backend,
            vitrina_server::service::VectorBackend::Memory
        );
    }
}
