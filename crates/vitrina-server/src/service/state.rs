//! Application state and dependency injection.

use std::sync::Arc;

use vitrina_recommend::{EmbeddingIndex, ProductCatalog, RecommendConfig, Recommender};

use crate::service::{HealthService, Result, ServiceConfig};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    recommender: Recommender,
    health_service: HealthService,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Validates the configuration and connects the configured stores.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let (catalog, index) = config.connect_stores().await?;
        Ok(Self::with_stores(catalog, index, config.recommend.clone()))
    }

    /// Builds state over explicit store implementations.
    ///
    /// Used by handler tests and anywhere stores are wired manually.
    pub fn with_stores(
        catalog: Arc<dyn ProductCatalog>,
        index: Arc<dyn EmbeddingIndex>,
        recommend: RecommendConfig,
    ) -> Self {
        Self {
            recommender: Recommender::new(index.clone(), catalog.clone(), recommend),
            health_service: HealthService::new(catalog, index),
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(recommender: Recommender);
impl_di!(health_service: HealthService);
