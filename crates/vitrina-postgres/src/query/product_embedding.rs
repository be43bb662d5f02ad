//! Product embeddings repository: storage and pgvector similarity search.

use std::future::Future;

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use pgvector::Vector;
use uuid::Uuid;

use crate::model::{NewProductEmbedding, ProductEmbedding, ScoredNeighbor};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for product embedding operations.
///
/// Nearest-neighbor search runs in the database through the pgvector
/// cosine distance operator, backed by the HNSW index.
pub trait ProductEmbeddingRepository {
    /// Inserts or replaces the embedding for `(kind, product_id)`.
    fn upsert_product_embedding(
        &mut self,
        new_embedding: NewProductEmbedding,
    ) -> impl Future<Output = PgResult<ProductEmbedding>> + Send;

    /// Finds the embedding stored for a product.
    ///
    /// Should the uniqueness of `(kind, product_id)` ever be violated,
    /// the most recently created row wins.
    fn find_product_embedding(
        &mut self,
        kind: &str,
        product_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ProductEmbedding>>> + Send;

    /// Deletes the embedding for `(kind, product_id)`.
    fn delete_product_embedding(
        &mut self,
        kind: &str,
        product_id: Uuid,
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Searches for the products most similar to the query vector.
    ///
    /// Returns `(product_id, score)` pairs ordered by descending
    /// similarity, restricted to rows of the given kind, with the
    /// excluded ids (typically the search source) and anything scoring
    /// below `min_score` filtered out in the database.
    fn search_similar_products(
        &mut self,
        query_embedding: Vector,
        kind: &str,
        exclude_ids: &[Uuid],
        min_score: f64,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<ScoredNeighbor>>> + Send;
}

impl ProductEmbeddingRepository for PgConnection {
    async fn upsert_product_embedding(
        &mut self,
        new_embedding: NewProductEmbedding,
    ) -> PgResult<ProductEmbedding> {
        use schema::product_embeddings::{self, dsl};

        let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());

        let embedding = diesel::insert_into(product_embeddings::table)
            .values(&new_embedding)
            .on_conflict((dsl::kind, dsl::product_id))
            .do_update()
            .set((
                dsl::embedding.eq(excluded(dsl::embedding)),
                dsl::model.eq(excluded(dsl::model)),
                dsl::updated_at.eq(now),
            ))
            .returning(ProductEmbedding::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(embedding)
    }

    async fn find_product_embedding(
        &mut self,
        kind: &str,
        product_id: Uuid,
    ) -> PgResult<Option<ProductEmbedding>> {
        use schema::product_embeddings::{self, dsl};

        let embedding = product_embeddings::table
            .filter(dsl::kind.eq(kind))
            .filter(dsl::product_id.eq(product_id))
            .order(dsl::created_at.desc())
            .select(ProductEmbedding::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(embedding)
    }

    async fn delete_product_embedding(&mut self, kind: &str, product_id: Uuid) -> PgResult<()> {
        use schema::product_embeddings::{self, dsl};

        diesel::delete(
            product_embeddings::table
                .filter(dsl::kind.eq(kind))
                .filter(dsl::product_id.eq(product_id)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(())
    }

    async fn search_similar_products(
        &mut self,
        query_embedding: Vector,
        kind: &str,
        exclude_ids: &[Uuid],
        min_score: f64,
        limit: i64,
    ) -> PgResult<Vec<ScoredNeighbor>> {
        use pgvector::VectorExpressionMethods;
        use schema::product_embeddings::{self, dsl};

        // score = 1 - distance, so the floor becomes a distance ceiling.
        let max_distance = 1.0 - min_score;

        let rows: Vec<(Uuid, f64)> = product_embeddings::table
            .filter(dsl::kind.eq(kind))
            .filter(dsl::product_id.ne_all(exclude_ids))
            .filter(
                dsl::embedding
                    .cosine_distance(&query_embedding)
                    .le(max_distance),
            )
            .order(dsl::embedding.cosine_distance(&query_embedding))
            .limit(limit)
            .select((
                dsl::product_id,
                (1.0.into_sql::<diesel::sql_types::Double>()
                    - dsl::embedding.cosine_distance(&query_embedding)),
            ))
            .load(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            kind,
            candidates = rows.len(),
            min_score,
            "Similarity search completed"
        );

        Ok(rows
            .into_iter()
            .map(|(product_id, score)| ScoredNeighbor { product_id, score })
            .collect())
    }
}
