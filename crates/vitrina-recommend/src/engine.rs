//! Similarity query engine: nearest-neighbor retrieval around a source item.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use crate::config::SimilarityParams;
use crate::error::StoreResult;
use crate::index::{EmbeddingIndex, EmbeddingKind, EmbeddingRecord, NeighborQuery};

/// Tracing target for engine operations.
const TRACING_TARGET: &str = "vitrina_recommend::engine";

/// A ranked similarity hit produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityMatch {
    /// The neighbor's product id.
    pub item_id: Uuid,
    /// Cosine similarity to the source product, in `[-1, 1]`.
    pub similarity: f32,
}

/// Nearest-neighbor retrieval around a source catalog item.
///
/// Each call is a fresh, stateless query. The engine is fail-open: store
/// errors and timeouts degrade to an empty result set and are reported
/// through tracing, never to the caller.
#[derive(Clone)]
pub struct SimilarityEngine {
    index: Arc<dyn EmbeddingIndex>,
    store_timeout: Duration,
}

impl SimilarityEngine {
    /// Creates a new engine over an embedding index.
    pub fn new(index: Arc<dyn EmbeddingIndex>, store_timeout: Duration) -> Self {
        Self {
            index,
            store_timeout,
        }
    }

    /// Finds the neighbors of `source_id` ranked by descending similarity.
    ///
    /// Returns an empty vector when the source has no embedding (a newly
    /// created product legitimately lacks one), when no neighbor clears
    /// `params.min_similarity`, or when the underlying store fails.
    pub async fn find_similar(
        &self,
        source_id: Uuid,
        params: &SimilarityParams,
    ) -> Vec<SimilarityMatch> {
        let Some(source) = self.source_embedding(source_id).await else {
            return Vec::new();
        };

        let query = NeighborQuery::new(EmbeddingKind::Product, source.vector, params.limit)
            .excluding(source_id)
            .with_min_similarity(params.min_similarity);

        let neighbors = self
            .guarded("nearest_neighbors", source_id, async {
                self.index.nearest_neighbors(&query).await
            })
            .await
            .unwrap_or_default();

        let mut matches: Vec<SimilarityMatch> = neighbors
            .into_iter()
            .filter(|neighbor| neighbor.item_id != source_id)
            .filter(|neighbor| neighbor.similarity >= params.min_similarity)
            .map(|neighbor| SimilarityMatch {
                item_id: neighbor.item_id,
                similarity: neighbor.similarity,
            })
            .collect();

        // Backends already return by descending similarity; the ordering
        // guarantee is owned here. `sort_by` is stable, so ties keep
        // their retrieval order.
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(params.limit);

        tracing::debug!(
            target: TRACING_TARGET,
            %source_id,
            matches = matches.len(),
            limit = params.limit,
            min_similarity = params.min_similarity,
            "Similarity query completed"
        );

        matches
    }

    /// Looks up the source item's embedding, treating failures as absence.
    async fn source_embedding(&self, source_id: Uuid) -> Option<EmbeddingRecord> {
        let found = self
            .guarded("find_embedding", source_id, async {
                self.index
                    .find_embedding(EmbeddingKind::Product, source_id)
                    .await
            })
            .await
            .flatten();

        if found.is_none() {
            tracing::debug!(
                target: TRACING_TARGET,
                %source_id,
                "No embedding stored for source item"
            );
        }

        found
    }

    /// Runs a store call bounded by the configured timeout, converting
    /// errors and timeouts into `None`.
    async fn guarded<T>(
        &self,
        operation: &'static str,
        source_id: Uuid,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> Option<T> {
        match timeout(self.store_timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(error)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    %source_id,
                    operation,
                    error = %error,
                    "Embedding store call failed, degrading to empty result"
                );
                None
            }
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    %source_id,
                    operation,
                    timeout = ?self.store_timeout,
                    "Embedding store call timed out, degrading to empty result"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for SimilarityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityEngine")
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::StoreError;
    use crate::index::Neighbor;

    /// Index stub returning a fixed source embedding and neighbor set.
    struct FixedIndex {
        source: Option<EmbeddingRecord>,
        neighbors: Vec<Neighbor>,
    }

    #[async_trait]
    impl EmbeddingIndex for FixedIndex {
        async fn find_embedding(
            &self,
            _kind: EmbeddingKind,
            _item_id: Uuid,
        ) -> StoreResult<Option<EmbeddingRecord>> {
            Ok(self.source.clone())
        }

        async fn nearest_neighbors(&self, query: &NeighborQuery) -> StoreResult<Vec<Neighbor>> {
            assert_eq!(query.kind, EmbeddingKind::Product);
            Ok(self.neighbors.clone())
        }

        async fn upsert_embedding(&self, _record: EmbeddingRecord) -> StoreResult<()> {
            Ok(())
        }

        async fn remove_embedding(&self, _kind: EmbeddingKind, _item_id: Uuid) -> StoreResult<()> {
            Ok(())
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    /// Index stub failing every call.
    struct FailingIndex;

    #[async_trait]
    impl EmbeddingIndex for FailingIndex {
        async fn find_embedding(
            &self,
            _kind: EmbeddingKind,
            _item_id: Uuid,
        ) -> StoreResult<Option<EmbeddingRecord>> {
            Err(StoreError::connection("index unavailable"))
        }

        async fn nearest_neighbors(&self, _query: &NeighborQuery) -> StoreResult<Vec<Neighbor>> {
            Err(StoreError::connection("index unavailable"))
        }

        async fn upsert_embedding(&self, _record: EmbeddingRecord) -> StoreResult<()> {
            Err(StoreError::connection("index unavailable"))
        }

        async fn remove_embedding(&self, _kind: EmbeddingKind, _item_id: Uuid) -> StoreResult<()> {
            Err(StoreError::connection("index unavailable"))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::connection("index unavailable"))
        }
    }

    /// Index stub that hangs on every call.
    struct HangingIndex;

    #[async_trait]
    impl EmbeddingIndex for HangingIndex {
        async fn find_embedding(
            &self,
            _kind: EmbeddingKind,
            _item_id: Uuid,
        ) -> StoreResult<Option<EmbeddingRecord>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }

        async fn nearest_neighbors(&self, _query: &NeighborQuery) -> StoreResult<Vec<Neighbor>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }

        async fn upsert_embedding(&self, _record: EmbeddingRecord) -> StoreResult<()> {
            Ok(())
        }

        async fn remove_embedding(&self, _kind: EmbeddingKind, _item_id: Uuid) -> StoreResult<()> {
            Ok(())
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    fn neighbor(similarity: f32) -> Neighbor {
        Neighbor {
            item_id: Uuid::new_v4(),
            similarity,
        }
    }

    fn source_record(item_id: Uuid) -> EmbeddingRecord {
        EmbeddingRecord::new(EmbeddingKind::Product, item_id, vec![1.0, 0.0, 0.0])
    }

    fn engine(index: impl EmbeddingIndex + 'static) -> SimilarityEngine {
        SimilarityEngine::new(Arc::new(index), Duration::from_secs(5))
    }

    fn params(limit: usize, min_similarity: f32) -> SimilarityParams {
        SimilarityParams {
            limit,
            min_similarity,
        }
    }

    #[tokio::test]
    async fn missing_source_embedding_yields_empty() {
        let engine = engine(FixedIndex {
            source: None,
            neighbors: vec![neighbor(0.9)],
        });

        let matches = engine.find_similar(Uuid::new_v4(), &params(4, 0.5)).await;
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn filters_below_floor_and_preserves_order() {
        let source_id = Uuid::new_v4();
        let close = neighbor(0.9);
        let mid = neighbor(0.6);
        let far = neighbor(0.3);

        let engine = engine(FixedIndex {
            source: Some(source_record(source_id)),
            neighbors: vec![close, mid, far],
        });

        let matches = engine.find_similar(source_id, &params(4, 0.5)).await;
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].item_id, close.item_id);
        assert_eq!(matches[1].item_id, mid.item_id);
        assert!(matches[0].similarity >= matches[1].similarity);
    }

    #[tokio::test]
    async fn excludes_source_item() {
        let source_id = Uuid::new_v4();
        let other = neighbor(0.8);

        // A backend bug surfaces the source itself; the engine drops it.
        let engine = engine(FixedIndex {
            source: Some(source_record(source_id)),
            neighbors: vec![
                Neighbor {
                    item_id: source_id,
                    similarity: 1.0,
                },
                other,
            ],
        });

        let matches = engine.find_similar(source_id, &params(4, 0.5)).await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].item_id, other.item_id);
    }

    #[tokio::test]
    async fn truncates_to_limit() {
        let source_id = Uuid::new_v4();
        let neighbors: Vec<Neighbor> = (0..10).map(|i| neighbor(0.9 - 0.01 * i as f32)).collect();

        let engine = engine(FixedIndex {
            source: Some(source_record(source_id)),
            neighbors,
        });

        let matches = engine.find_similar(source_id, &params(3, 0.5)).await;
        assert_eq!(matches.len(), 3);
    }

    #[tokio::test]
    async fn reorders_unsorted_backend_results() {
        let source_id = Uuid::new_v4();
        let engine = engine(FixedIndex {
            source: Some(source_record(source_id)),
            neighbors: vec![neighbor(0.55), neighbor(0.95), neighbor(0.7)],
        });

        let matches = engine.find_similar(source_id, &params(4, 0.5)).await;
        let similarities: Vec<f32> = matches.iter().map(|m| m.similarity).collect();
        assert_eq!(similarities, vec![0.95, 0.7, 0.55]);
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty() {
        let engine = engine(FailingIndex);
        let matches = engine.find_similar(Uuid::new_v4(), &params(4, 0.5)).await;
        assert!(matches.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn store_timeout_degrades_to_empty() {
        let engine = SimilarityEngine::new(Arc::new(HangingIndex), Duration::from_millis(100));
        let matches = engine.find_similar(Uuid::new_v4(), &params(4, 0.5)).await;
        assert!(matches.is_empty());
    }
}
