//! CORS middleware.

use axum::Router;
use axum::http::{HeaderValue, Method};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

/// Tracing target for middleware configuration.
const TRACING_TARGET: &str = "vitrina_server::middleware";

/// CORS settings for the storefront origins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-allowed-origin", env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,
}

/// Extension trait attaching CORS handling.
pub trait RouterSecurityExt {
    /// Attaches a CORS layer for the configured origins.
    fn with_security(self, config: CorsConfig) -> Self;
}

impl RouterSecurityExt for Router {
    fn with_security(self, config: CorsConfig) -> Self {
        let mut cors = CorsLayer::new()
            .allow_methods([Method::GET])
            .allow_headers(Any);

        if config.allowed_origins.is_empty() {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<HeaderValue> = config
                .allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            origin,
                            "Skipping unparseable CORS origin"
                        );
                        None
                    }
                })
                .collect();
            cors = cors.allow_origin(origins);
        }

        self.layer(cors)
    }
}
