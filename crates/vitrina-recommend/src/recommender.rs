//! End-to-end recommendation facade: engine then assembler.

use std::sync::Arc;

use uuid::Uuid;

use crate::assemble::RecommendationAssembler;
use crate::catalog::{ProductCatalog, RecommendedProduct};
use crate::config::{RecommendConfig, SimilarityParams};
use crate::engine::SimilarityEngine;
use crate::index::EmbeddingIndex;

/// Composed recommendation pipeline.
///
/// Stateless between calls: two invocations with no intervening data
/// changes yield identical ordered output. The nearest-neighbor query
/// always completes before the catalog lookup begins (the assembler
/// consumes the engine's ranking).
#[derive(Debug, Clone)]
pub struct Recommender {
    engine: SimilarityEngine,
    assembler: RecommendationAssembler,
    config: RecommendConfig,
}

impl Recommender {
    /// Creates a recommender over an embedding index and product catalog.
    pub fn new(
        index: Arc<dyn EmbeddingIndex>,
        catalog: Arc<dyn ProductCatalog>,
        config: RecommendConfig,
    ) -> Self {
        let store_timeout = config.store_timeout();

        Self {
            engine: SimilarityEngine::new(index, store_timeout),
            assembler: RecommendationAssembler::new(catalog, store_timeout),
            config,
        }
    }

    /// Resolves per-request overrides against the configured defaults.
    pub fn params(&self, limit: Option<usize>, min_similarity: Option<f32>) -> SimilarityParams {
        self.config.resolve(limit, min_similarity)
    }

    /// Returns ranked, catalog-enriched recommendations for a product.
    ///
    /// An empty result is the normal outcome for products without an
    /// embedding, without qualifying neighbors, or behind a failing
    /// store; it never signals an error.
    pub async fn recommend(
        &self,
        source_id: Uuid,
        params: &SimilarityParams,
    ) -> Vec<RecommendedProduct> {
        let matches = self.engine.find_similar(source_id, params).await;
        if matches.is_empty() {
            return Vec::new();
        }

        self.assembler.assemble(&matches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogProduct;
    use crate::index::{EmbeddingKind, EmbeddingRecord};
    use crate::memory::{MemoryCatalog, MemoryIndex};

    fn product(id: Uuid, title: &str) -> CatalogProduct {
        let now = jiff::Timestamp::UNIX_EPOCH;
        CatalogProduct {
            id,
            title: title.to_string(),
            description: String::new(),
            price: bigdecimal::BigDecimal::from(42),
            currency: "usd".to_string(),
            category: Some("studio".to_string()),
            image_url: None,
            video_url: None,
            seller_id: Uuid::new_v4(),
            stock_quantity: 3,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seeds a source product plus three neighbors at cosine similarity
    /// roughly 0.9, 0.6, and 0.3 against the source vector.
    async fn seeded_stores() -> (Arc<MemoryIndex>, Arc<MemoryCatalog>, Uuid, Uuid, Uuid, Uuid) {
        let index = Arc::new(MemoryIndex::new(2));
        let catalog = Arc::new(MemoryCatalog::new());

        let source = Uuid::new_v4();
        let near = Uuid::new_v4();
        let mid = Uuid::new_v4();
        let far = Uuid::new_v4();

        // Angles chosen so cos(theta) lands near 0.9 / 0.6 / 0.3.
        let vectors = [
            (source, vec![1.0, 0.0]),
            (near, vec![0.9, 0.435_889_9]),
            (mid, vec![0.6, 0.8]),
            (far, vec![0.3, 0.953_939_2]),
        ];

        for (id, vector) in vectors {
            index
                .upsert_embedding(EmbeddingRecord::new(EmbeddingKind::Product, id, vector))
                .await
                .unwrap();
        }

        for (id, title) in [(source, "source"), (near, "near"), (mid, "mid"), (far, "far")] {
            catalog.insert(product(id, title)).await;
        }

        (index, catalog, source, near, mid, far)
    }

    #[tokio::test]
    async fn recommends_qualifying_neighbors_in_order() {
        let (index, catalog, source, near, mid, far) = seeded_stores().await;
        let recommender = Recommender::new(index, catalog, RecommendConfig::default());

        let params = recommender.params(None, None);
        let items = recommender.recommend(source, &params).await;

        let ids: Vec<Uuid> = items.iter().map(|r| r.product.id).collect();
        assert_eq!(ids, vec![near, mid]);
        assert!(!ids.contains(&far));
        assert!(!ids.contains(&source));
        assert!(items[0].similarity >= items[1].similarity);
        assert!(items.iter().all(|r| r.similarity >= 0.5));
    }

    #[tokio::test]
    async fn unknown_source_yields_empty() {
        let (index, catalog, ..) = seeded_stores().await;
        let recommender = Recommender::new(index, catalog, RecommendConfig::default());

        let params = recommender.params(None, None);
        let items = recommender.recommend(Uuid::new_v4(), &params).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn deleted_catalog_row_is_dropped() {
        let (index, catalog, source, near, mid, _far) = seeded_stores().await;
        catalog.remove(near).await;

        let recommender = Recommender::new(index, catalog, RecommendConfig::default());
        let params = recommender.params(None, None);
        let items = recommender.recommend(source, &params).await;

        let ids: Vec<Uuid> = items.iter().map(|r| r.product.id).collect();
        assert_eq!(ids, vec![mid]);
    }

    #[tokio::test]
    async fn repeated_calls_are_idempotent() {
        let (index, catalog, source, ..) = seeded_stores().await;
        let recommender = Recommender::new(index, catalog, RecommendConfig::default());

        let params = recommender.params(None, None);
        let first = recommender.recommend(source, &params).await;
        let second = recommender.recommend(source, &params).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn per_request_overrides_narrow_results() {
        let (index, catalog, source, near, ..) = seeded_stores().await;
        let recommender = Recommender::new(index, catalog, RecommendConfig::default());

        let params = recommender.params(Some(1), Some(0.2));
        let items = recommender.recommend(source, &params).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id, near);
    }
}
