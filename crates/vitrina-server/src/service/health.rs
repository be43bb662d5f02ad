//! Store health monitoring.

use std::fmt;
use std::sync::Arc;

use vitrina_recommend::{EmbeddingIndex, ProductCatalog};

/// Tracing target for health checks.
const TRACING_TARGET: &str = "vitrina_server::service::health";

/// Aggregated health checks over the catalog and embedding stores.
#[derive(Clone)]
pub struct HealthService {
    catalog: Arc<dyn ProductCatalog>,
    index: Arc<dyn EmbeddingIndex>,
}

impl HealthService {
    /// Creates a health service over the two stores.
    pub fn new(catalog: Arc<dyn ProductCatalog>, index: Arc<dyn EmbeddingIndex>) -> Self {
        Self { catalog, index }
    }

    /// Pings both stores concurrently; healthy only when both respond.
    pub async fn is_healthy(&self) -> bool {
        let (catalog, index) = tokio::join!(self.catalog.ping(), self.index.ping());

        if let Err(error) = &catalog {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Catalog store health check failed"
            );
        }

        if let Err(error) = &index {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Embedding index health check failed"
            );
        }

        catalog.is_ok() && index.is_ok()
    }
}

impl fmt::Debug for HealthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthService").finish_non_exhaustive()
    }
}
