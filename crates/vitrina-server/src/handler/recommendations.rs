//! Product recommendation handlers.

use axum::Json;
use axum::extract::State;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;
use validator::Validate;
use vitrina_recommend::Recommender;

use crate::extract::{Path, Query};
use crate::handler::request::RecommendationParams;
use crate::handler::response::{ErrorResponse, RecommendationsResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for recommendation handlers.
const TRACING_TARGET: &str = "vitrina_server::handler::recommendations";

#[utoipa::path(
    get,
    path = "/products/{product_id}/recommendations",
    tag = "recommendations",
    summary = "List products similar to a source product",
    params(
        ("product_id" = Uuid, Path, description = "Source product id"),
        RecommendationParams,
    ),
    responses(
        (
            status = 200,
            description = "Ranked recommendations; empty when the product has no \
                           embedding, no qualifying neighbors, or a backing store \
                           is unavailable",
            body = RecommendationsResponse,
        ),
        (
            status = 400,
            description = "Malformed product id or out-of-range query parameters",
            body = ErrorResponse,
        ),
    ),
)]
async fn list_recommendations(
    State(recommender): State<Recommender>,
    Path(product_id): Path<Uuid>,
    Query(params): Query<RecommendationParams>,
) -> Result<Json<RecommendationsResponse>> {
    params.validate().map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid recommendation parameters")
            .with_context(err.to_string())
    })?;

    let resolved = recommender.params(params.limit, params.min_similarity);
    let items = recommender.recommend(product_id, &resolved).await;

    tracing::debug!(
        target: TRACING_TARGET,
        %product_id,
        total = items.len(),
        limit = resolved.limit,
        min_similarity = resolved.min_similarity,
        "Recommendations resolved"
    );

    Ok(Json(RecommendationsResponse {
        total: items.len(),
        items,
    }))
}

/// Returns a [`Router`] with all recommendation routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(list_recommendations))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use uuid::Uuid;
    use vitrina_recommend::memory::{MemoryCatalog, MemoryIndex};
    use vitrina_recommend::{
        CatalogProduct, EmbeddingIndex, EmbeddingKind, EmbeddingRecord, Neighbor, NeighborQuery,
        ProductCatalog, RecommendConfig, StoreError, StoreResult,
    };

    use super::*;
    use crate::handler::test::{create_test_server, create_test_server_with_stores};

    fn product(id: Uuid, title: &str) -> CatalogProduct {
        let now = jiff::Timestamp::UNIX_EPOCH;
        CatalogProduct {
            id,
            title: title.to_string(),
            description: String::new(),
            price: bigdecimal::BigDecimal::from(15),
            currency: "usd".to_string(),
            category: Some("studio".to_string()),
            image_url: None,
            video_url: None,
            seller_id: Uuid::new_v4(),
            stock_quantity: 2,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    struct Seeded {
        catalog: Arc<MemoryCatalog>,
        source: Uuid,
        near: Uuid,
        mid: Uuid,
        far: Uuid,
        server: TestServer,
    }

    /// Seeds a source product plus neighbors at cosine similarity
    /// roughly 0.9, 0.6, and 0.3.
    async fn seeded_server() -> anyhow::Result<Seeded> {
        let index = Arc::new(MemoryIndex::new(2));
        let catalog = Arc::new(MemoryCatalog::new());

        let source = Uuid::new_v4();
        let near = Uuid::new_v4();
        let mid = Uuid::new_v4();
        let far = Uuid::new_v4();

        let vectors = [
            (source, vec![1.0, 0.0]),
            (near, vec![0.9, 0.435_889_9]),
            (mid, vec![0.6, 0.8]),
            (far, vec![0.3, 0.953_939_2]),
        ];

        for (id, vector) in vectors {
            index
                .upsert_embedding(EmbeddingRecord::new(EmbeddingKind::Product, id, vector))
                .await?;
        }

        for (id, title) in [(source, "source"), (near, "near"), (mid, "mid"), (far, "far")] {
            catalog.insert(product(id, title)).await;
        }

        let server = create_test_server(catalog.clone(), index).await?;

        Ok(Seeded {
            catalog,
            source,
            near,
            mid,
            far,
            server,
        })
    }

    #[tokio::test]
    async fn returns_ranked_recommendations() -> anyhow::Result<()> {
        let seeded = seeded_server().await?;

        let response = seeded
            .server
            .get(&format!("/products/{}/recommendations", seeded.source))
            .await;
        response.assert_status_ok();

        let body = response.json::<RecommendationsResponse>();
        assert_eq!(body.total, 2);

        let ids: Vec<Uuid> = body.items.iter().map(|r| r.product.id).collect();
        assert_eq!(ids, vec![seeded.near, seeded.mid]);
        assert!(!ids.contains(&seeded.far));
        assert!(!ids.contains(&seeded.source));
        assert!(body.items[0].similarity >= body.items[1].similarity);
        assert!(body.items.iter().all(|r| r.similarity >= 0.5));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_returns_empty_ok() -> anyhow::Result<()> {
        let seeded = seeded_server().await?;

        let response = seeded
            .server
            .get(&format!("/products/{}/recommendations", Uuid::new_v4()))
            .await;
        response.assert_status_ok();

        let body = response.json::<RecommendationsResponse>();
        assert!(body.items.is_empty());
        assert_eq!(body.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_catalog_row_is_dropped() -> anyhow::Result<()> {
        let seeded = seeded_server().await?;
        seeded.catalog.remove(seeded.near).await;

        let response = seeded
            .server
            .get(&format!("/products/{}/recommendations", seeded.source))
            .await;
        response.assert_status_ok();

        let body = response.json::<RecommendationsResponse>();
        assert_eq!(body.total, 1);
        assert_eq!(body.items[0].product.id, seeded.mid);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_product_id_returns_400() -> anyhow::Result<()> {
        let seeded = seeded_server().await?;

        let response = seeded
            .server
            .get("/products/not-a-uuid/recommendations")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "bad_request");

        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_params_return_400() -> anyhow::Result<()> {
        let seeded = seeded_server().await?;

        let response = seeded
            .server
            .get(&format!(
                "/products/{}/recommendations?limit=500",
                seeded.source
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = seeded
            .server
            .get(&format!(
                "/products/{}/recommendations?min_similarity=2.0",
                seeded.source
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn per_request_overrides_apply() -> anyhow::Result<()> {
        let seeded = seeded_server().await?;

        let response = seeded
            .server
            .get(&format!(
                "/products/{}/recommendations?limit=1&min_similarity=0.2",
                seeded.source
            ))
            .await;
        response.assert_status_ok();

        let body = response.json::<RecommendationsResponse>();
        assert_eq!(body.total, 1);
        assert_eq!(body.items[0].product.id, seeded.near);

        Ok(())
    }

    /// Store stubs failing every call, for the fail-open contract.
    struct DownCatalog;

    #[async_trait]
    impl ProductCatalog for DownCatalog {
        async fn products_by_ids(&self, _ids: &[Uuid]) -> StoreResult<Vec<CatalogProduct>> {
            Err(StoreError::connection("catalog down"))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::connection("catalog down"))
        }
    }

    struct DownIndex;

    #[async_trait]
    impl EmbeddingIndex for DownIndex {
        async fn find_embedding(
            &self,
            _kind: EmbeddingKind,
            _item_id: Uuid,
        ) -> StoreResult<Option<EmbeddingRecord>> {
            Err(StoreError::connection("index down"))
        }

        async fn nearest_neighbors(&self, _query: &NeighborQuery) -> StoreResult<Vec<Neighbor>> {
            Err(StoreError::connection("index down"))
        }

        async fn upsert_embedding(&self, _record: EmbeddingRecord) -> StoreResult<()> {
            Err(StoreError::connection("index down"))
        }

        async fn remove_embedding(&self, _kind: EmbeddingKind, _item_id: Uuid) -> StoreResult<()> {
            Err(StoreError::connection("index down"))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::connection("index down"))
        }
    }

    #[tokio::test]
    async fn failing_stores_return_empty_ok() -> anyhow::Result<()> {
        let server = create_test_server_with_stores(
            Arc::new(DownCatalog),
            Arc::new(DownIndex),
            RecommendConfig::default(),
        )?;

        let response = server
            .get(&format!("/products/{}/recommendations", Uuid::new_v4()))
            .await;
        response.assert_status_ok();

        let body = response.json::<RecommendationsResponse>();
        assert!(body.items.is_empty());
        assert_eq!(body.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn repeated_requests_are_idempotent() -> anyhow::Result<()> {
        let seeded = seeded_server().await?;
        let url = format!("/products/{}/recommendations", seeded.source);

        let first = seeded.server.get(&url).await.json::<RecommendationsResponse>();
        let second = seeded.server.get(&url).await.json::<RecommendationsResponse>();

        assert_eq!(first.items, second.items);
        assert_eq!(first.total, second.total);

        Ok(())
    }
}
