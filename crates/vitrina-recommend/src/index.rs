//! Embedding store port: point lookups and nearest-neighbor queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreResult;

/// Discriminator for the entity an embedding represents.
///
/// Stored alongside every vector so that a single index can hold
/// embeddings for multiple entity types without cross-contamination.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmbeddingKind {
    /// Catalog product embedding.
    Product,
}

impl EmbeddingKind {
    /// Returns the kind as the string stored alongside the vector.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
        }
    }
}

/// A stored embedding for a single catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// The domain entity this embedding represents.
    pub item_id: Uuid,
    /// Entity type discriminator.
    pub kind: EmbeddingKind,
    /// The embedding vector. Dimensionality is fixed by the embedding
    /// provider and must be identical across all comparable records.
    pub vector: Vec<f32>,
    /// Name of the model that produced the vector.
    pub model: String,
}

impl EmbeddingRecord {
    /// Creates a new embedding record.
    pub fn new(kind: EmbeddingKind, item_id: Uuid, vector: Vec<f32>) -> Self {
        Self {
            item_id,
            kind,
            vector,
            model: String::new(),
        }
    }

    /// Sets the name of the model that produced the vector.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Returns the embedding dimensions.
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// A nearest-neighbor hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// The neighbor's domain identifier.
    pub item_id: Uuid,
    /// Cosine similarity to the query vector, in `[-1, 1]`.
    pub similarity: f32,
}

/// Parameters for a nearest-neighbor query.
#[derive(Debug, Clone)]
pub struct NeighborQuery {
    /// Restricts candidates to records of this kind.
    pub kind: EmbeddingKind,
    /// The query vector.
    pub vector: Vec<f32>,
    /// Item excluded from the candidate set (the query's source).
    pub exclude_item: Option<Uuid>,
    /// Optional similarity floor backends may push into the store query.
    /// The engine re-applies the floor regardless.
    pub min_similarity: Option<f32>,
    /// Maximum number of neighbors to return.
    pub limit: usize,
}

impl NeighborQuery {
    /// Creates a new nearest-neighbor query.
    pub fn new(kind: EmbeddingKind, vector: Vec<f32>, limit: usize) -> Self {
        Self {
            kind,
            vector,
            exclude_item: None,
            min_similarity: None,
            limit,
        }
    }

    /// Excludes an item from the candidate set.
    pub fn excluding(mut self, item_id: Uuid) -> Self {
        self.exclude_item = Some(item_id);
        self
    }

    /// Sets the similarity floor hint.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = Some(min_similarity);
        self
    }
}

/// Trait for embedding store backends.
///
/// Implementations must return neighbors ordered by descending
/// similarity. At most one record exists per `(kind, item_id)` pair;
/// a backend whose storage permits duplicates must resolve point
/// lookups to the most recently created record instead of erroring.
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Looks up the embedding stored for an item, if any.
    async fn find_embedding(
        &self,
        kind: EmbeddingKind,
        item_id: Uuid,
    ) -> StoreResult<Option<EmbeddingRecord>>;

    /// Returns the nearest neighbors of the query vector.
    async fn nearest_neighbors(&self, query: &NeighborQuery) -> StoreResult<Vec<Neighbor>>;

    /// Inserts or replaces the embedding for `(kind, item_id)`.
    async fn upsert_embedding(&self, record: EmbeddingRecord) -> StoreResult<()>;

    /// Removes the embedding for `(kind, item_id)` if present.
    async fn remove_embedding(&self, kind: EmbeddingKind, item_id: Uuid) -> StoreResult<()>;

    /// Checks backend connectivity.
    async fn ping(&self) -> StoreResult<()>;
}
