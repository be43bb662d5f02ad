//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod recommendations;
mod request;
mod response;

use axum::response::{IntoResponse, Response};
use utoipa_axum::router::OpenApiRouter;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::request::RecommendationParams;
pub use crate::handler::response::{ErrorResponse, HealthResponse, RecommendationsResponse};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`OpenApiRouter`] with all routes.
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .merge(recommendations::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use axum_test::TestServer;
    use vitrina_recommend::memory::{MemoryCatalog, MemoryIndex};
    use vitrina_recommend::{EmbeddingIndex, ProductCatalog, RecommendConfig};

    use crate::handler::routes;
    use crate::service::ServiceState;

    /// Returns a new [`TestServer`] over in-memory stores.
    pub async fn create_test_server(
        catalog: Arc<MemoryCatalog>,
        index: Arc<MemoryIndex>,
    ) -> anyhow::Result<TestServer> {
        create_test_server_with_stores(catalog, index, RecommendConfig::default())
    }

    /// Returns a new [`TestServer`] over explicit store implementations.
    pub fn create_test_server_with_stores(
        catalog: Arc<dyn ProductCatalog>,
        index: Arc<dyn EmbeddingIndex>,
        recommend: RecommendConfig,
    ) -> anyhow::Result<TestServer> {
        let state = ServiceState::with_stores(catalog, index, recommend);
        let app = routes().with_state(state);
        let (app, _) = app.split_for_parts();
        let server = TestServer::new(app)?;
        Ok(server)
    }

    #[tokio::test]
    async fn unknown_route_returns_404() -> anyhow::Result<()> {
        let server =
            create_test_server(Arc::new(MemoryCatalog::new()), Arc::new(MemoryIndex::new(2)))
                .await?;

        let response = server.get("/nope").await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);

        Ok(())
    }
}
