//! In-memory store implementations.
//!
//! Exact-scan reference backends for both ports. Used for local
//! development without external services and as test doubles for the
//! HTTP layer. Not suitable for large catalogs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::{CatalogProduct, ProductCatalog};
use crate::error::{StoreError, StoreResult};
use crate::index::{EmbeddingIndex, EmbeddingKind, EmbeddingRecord, Neighbor, NeighborQuery};

/// Tracing target for in-memory store operations.
const TRACING_TARGET: &str = "vitrina_recommend::memory";

/// In-memory embedding index with exact cosine scan.
pub struct MemoryIndex {
    dimensions: usize,
    records: RwLock<HashMap<(EmbeddingKind, Uuid), EmbeddingRecord>>,
}

impl MemoryIndex {
    /// Creates an empty index for vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        tracing::debug!(
            target: TRACING_TARGET,
            dimensions,
            "Initialized in-memory embedding index"
        );

        Self {
            dimensions,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the number of stored embeddings.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns whether the index is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_dimensions(&self, vector: &[f32]) -> StoreResult<()> {
        if vector.len() != self.dimensions {
            return Err(StoreError::dimension_mismatch(
                self.dimensions,
                vector.len(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingIndex for MemoryIndex {
    async fn find_embedding(
        &self,
        kind: EmbeddingKind,
        item_id: Uuid,
    ) -> StoreResult<Option<EmbeddingRecord>> {
        Ok(self.records.read().await.get(&(kind, item_id)).cloned())
    }

    async fn nearest_neighbors(&self, query: &NeighborQuery) -> StoreResult<Vec<Neighbor>> {
        self.check_dimensions(&query.vector)?;

        let records = self.records.read().await;
        let mut neighbors: Vec<Neighbor> = records
            .values()
            .filter(|record| record.kind == query.kind)
            .filter(|record| query.exclude_item != Some(record.item_id))
            .map(|record| Neighbor {
                item_id: record.item_id,
                similarity: cosine_similarity(&query.vector, &record.vector),
            })
            .filter(|neighbor| {
                query
                    .min_similarity
                    .is_none_or(|floor| neighbor.similarity >= floor)
            })
            .collect();

        neighbors.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        neighbors.truncate(query.limit);

        Ok(neighbors)
    }

    async fn upsert_embedding(&self, record: EmbeddingRecord) -> StoreResult<()> {
        self.check_dimensions(&record.vector)?;

        self.records
            .write()
            .await
            .insert((record.kind, record.item_id), record);

        Ok(())
    }

    async fn remove_embedding(&self, kind: EmbeddingKind, item_id: Uuid) -> StoreResult<()> {
        self.records.write().await.remove(&(kind, item_id));
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIndex")
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<HashMap<Uuid, CatalogProduct>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product.
    pub async fn insert(&self, product: CatalogProduct) {
        self.products.write().await.insert(product.id, product);
    }

    /// Removes a product, mimicking a catalog-side deletion.
    pub async fn remove(&self, id: Uuid) {
        self.products.write().await.remove(&id);
    }
}

#[async_trait]
impl ProductCatalog for MemoryCatalog {
    async fn products_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<CatalogProduct>> {
        let products = self.products.read().await;
        // HashMap iteration order stands in for the unordered bulk
        // lookup of a real catalog store.
        Ok(products
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Zero-magnitude vectors compare as dissimilar (0.0) rather than NaN.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(item_id: Uuid, vector: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord::new(EmbeddingKind::Product, item_id, vector)
    }

    #[test]
    fn cosine_similarity_bounds() {
        let a = vec![1.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&a, &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_record() {
        let index = MemoryIndex::new(2);
        let item = Uuid::new_v4();

        index.upsert_embedding(record(item, vec![1.0, 0.0])).await.unwrap();
        index.upsert_embedding(record(item, vec![0.0, 1.0])).await.unwrap();

        assert_eq!(index.len().await, 1);
        let stored = index
            .find_embedding(EmbeddingKind::Product, item)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.vector, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn rejects_mismatched_dimensions() {
        let index = MemoryIndex::new(3);
        let result = index
            .upsert_embedding(record(Uuid::new_v4(), vec![1.0, 0.0]))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[tokio::test]
    async fn nearest_neighbors_orders_and_excludes() {
        let index = MemoryIndex::new(2);
        let source = Uuid::new_v4();
        let close = Uuid::new_v4();
        let far = Uuid::new_v4();

        index.upsert_embedding(record(source, vec![1.0, 0.0])).await.unwrap();
        index.upsert_embedding(record(close, vec![0.9, 0.1])).await.unwrap();
        index.upsert_embedding(record(far, vec![0.1, 0.9])).await.unwrap();

        let query = NeighborQuery::new(EmbeddingKind::Product, vec![1.0, 0.0], 10)
            .excluding(source);
        let neighbors = index.nearest_neighbors(&query).await.unwrap();

        let ids: Vec<Uuid> = neighbors.iter().map(|n| n.item_id).collect();
        assert_eq!(ids, vec![close, far]);
    }

    #[tokio::test]
    async fn nearest_neighbors_applies_floor_hint() {
        let index = MemoryIndex::new(2);
        index
            .upsert_embedding(record(Uuid::new_v4(), vec![0.0, 1.0]))
            .await
            .unwrap();

        let query = NeighborQuery::new(EmbeddingKind::Product, vec![1.0, 0.0], 10)
            .with_min_similarity(0.5);
        let neighbors = index.nearest_neighbors(&query).await.unwrap();
        assert!(neighbors.is_empty());
    }

    #[tokio::test]
    async fn catalog_returns_only_live_products() {
        let catalog = MemoryCatalog::new();
        let id = Uuid::new_v4();
        let missing = Uuid::new_v4();

        let now = jiff::Timestamp::UNIX_EPOCH;
        catalog
            .insert(CatalogProduct {
                id,
                title: "ring light".to_string(),
                description: String::new(),
                price: bigdecimal::BigDecimal::from(25),
                currency: "usd".to_string(),
                category: None,
                image_url: None,
                video_url: None,
                seller_id: Uuid::new_v4(),
                stock_quantity: 5,
                is_published: true,
                created_at: now,
                updated_at: now,
            })
            .await;

        let found = catalog.products_by_ids(&[id, missing]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
    }
}
