//! Embedding index port backed by the `product_embeddings` table.

use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;
use vitrina_recommend::{
    EmbeddingIndex, EmbeddingKind, EmbeddingRecord, Neighbor, NeighborQuery, StoreResult,
};

use super::store_error;
use crate::PgClient;
use crate::model::NewProductEmbedding;
use crate::query::ProductEmbeddingRepository;

/// [`EmbeddingIndex`] implementation over pgvector.
///
/// The kind filter, source exclusion, similarity floor, and ordering
/// are all pushed into the database query.
#[derive(Debug, Clone)]
pub struct PgEmbeddingIndex {
    client: PgClient,
}

impl PgEmbeddingIndex {
    /// Creates an index adapter over a database client.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingIndex for PgEmbeddingIndex {
    async fn find_embedding(
        &self,
        kind: EmbeddingKind,
        item_id: Uuid,
    ) -> StoreResult<Option<EmbeddingRecord>> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;

        let found = conn
            .find_product_embedding(kind.as_str(), item_id)
            .await
            .map_err(store_error)?;

        Ok(found.map(|row| {
            EmbeddingRecord::new(kind, row.product_id, row.embedding.as_slice().to_vec())
                .with_model(row.model)
        }))
    }

    async fn nearest_neighbors(&self, query: &NeighborQuery) -> StoreResult<Vec<Neighbor>> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;

        let exclude_ids: Vec<Uuid> = query.exclude_item.into_iter().collect();
        // Without a floor, admit the entire cosine range.
        let min_score = query.min_similarity.map(f64::from).unwrap_or(-1.0);

        let neighbors = conn
            .search_similar_products(
                Vector::from(query.vector.clone()),
                query.kind.as_str(),
                &exclude_ids,
                min_score,
                query.limit as i64,
            )
            .await
            .map_err(store_error)?;

        Ok(neighbors
            .into_iter()
            .map(|scored| Neighbor {
                item_id: scored.product_id,
                similarity: scored.score as f32,
            })
            .collect())
    }

    async fn upsert_embedding(&self, record: EmbeddingRecord) -> StoreResult<()> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;

        conn.upsert_product_embedding(NewProductEmbedding {
            product_id: record.item_id,
            kind: record.kind.as_str().to_string(),
            embedding: Vector::from(record.vector),
            model: record.model,
        })
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn remove_embedding(&self, kind: EmbeddingKind, item_id: Uuid) -> StoreResult<()> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;

        conn.delete_product_embedding(kind.as_str(), item_id)
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client.ping().await.map_err(store_error)
    }
}
