//! HTTP serving and lifecycle management.

mod http_server;
mod shutdown;

use std::io;

pub use self::http_server::serve_http;
pub(crate) use self::shutdown::shutdown_signal;

/// Tracing target for server startup.
pub(crate) const TRACING_TARGET_STARTUP: &str = "vitrina_cli::server::startup";

/// Tracing target for server shutdown.
pub(crate) const TRACING_TARGET_SHUTDOWN: &str = "vitrina_cli::server::shutdown";

/// Errors from the serving lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Server configuration failed validation.
    #[error("invalid server configuration: {0}")]
    InvalidConfig(String),

    /// Could not bind the listening socket.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server terminated with an I/O error.
    #[error("server runtime error: {0}")]
    Runtime(#[from] io::Error),
}

/// A specialized [`Result`] type for server lifecycle operations.
pub type Result<T, E = ServerError> = std::result::Result<T, E>;
