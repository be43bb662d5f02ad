//! Product embedding model for pgvector similarity search.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use pgvector::Vector;
use uuid::Uuid;

use crate::schema::product_embeddings;

/// A stored embedding for a catalog product.
///
/// At most one active row exists per `(kind, product_id)`; upserts
/// replace the vector in place when a product's descriptive content
/// changes.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = product_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductEmbedding {
    /// Unique row identifier.
    pub id: Uuid,
    /// The product this embedding represents.
    pub product_id: Uuid,
    /// Entity type discriminator.
    pub kind: String,
    /// The embedding vector.
    pub embedding: Vector,
    /// Model that produced the vector.
    pub model: String,
    /// Timestamp when the row was created.
    pub created_at: Timestamp,
    /// Timestamp when the row was last updated.
    pub updated_at: Timestamp,
}

/// Data for inserting or replacing a product embedding.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = product_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProductEmbedding {
    /// Product the embedding belongs to.
    pub product_id: Uuid,
    /// Entity type discriminator.
    pub kind: String,
    /// The embedding vector.
    pub embedding: Vector,
    /// Model that produced the vector.
    pub model: String,
}

impl ProductEmbedding {
    /// Returns the embedding dimensions.
    pub fn dimensions(&self) -> usize {
        self.embedding.as_slice().len()
    }
}

/// A neighbor product id with its similarity score.
///
/// Returned from similarity search queries; the score is
/// `1 - cosine_distance`, computed in the database.
#[derive(Debug, Clone, Copy)]
pub struct ScoredNeighbor {
    /// The neighbor's product id.
    pub product_id: Uuid,
    /// Cosine similarity to the query vector.
    pub score: f64,
}
