//! Qdrant embedding index implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfig;
use qdrant_client::qdrant::with_payload_selector::SelectorOptions;
use qdrant_client::qdrant::with_vectors_selector::SelectorOptions as VectorsSelectorOptions;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, GetPointsBuilder,
    PointId, PointStruct, PointsIdsList, SearchPointsBuilder, UpsertPointsBuilder, Value,
    VectorParamsBuilder,
};
use uuid::Uuid;
use vitrina_recommend::{
    EmbeddingIndex, EmbeddingKind, EmbeddingRecord, Neighbor, NeighborQuery, StoreError,
    StoreResult,
};

use crate::TRACING_TARGET;
use crate::config::QdrantConfig;

/// Payload field carrying the entity kind.
const PAYLOAD_KIND: &str = "kind";

/// Payload field carrying the item id.
const PAYLOAD_ITEM_ID: &str = "item_id";

/// Payload field carrying the embedding model name.
const PAYLOAD_MODEL: &str = "model";

/// Qdrant-backed embedding index.
///
/// Point ids are the item ids; the kind discriminator lives in the
/// payload and is enforced with a `must` filter on every search.
pub struct QdrantIndex {
    client: Qdrant,
    config: QdrantConfig,
}

impl QdrantIndex {
    /// Connects to Qdrant and ensures the collection exists.
    pub async fn connect(config: QdrantConfig) -> StoreResult<Self> {
        config.validate().map_err(StoreError::backend)?;

        let client = Qdrant::from_url(&config.qdrant_url)
            .api_key(config.qdrant_api_key.clone())
            .build()
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let this = Self { client, config };
        this.ensure_collection().await?;

        tracing::info!(
            target: TRACING_TARGET,
            url = %this.config.qdrant_url,
            collection = %this.config.qdrant_collection,
            dimensions = this.config.qdrant_dimensions,
            "Connected to Qdrant"
        );

        Ok(this)
    }

    /// Ensures the embeddings collection exists, creating it if necessary.
    async fn ensure_collection(&self) -> StoreResult<()> {
        let collection = &self.config.qdrant_collection;

        let exists = self
            .client
            .collection_exists(collection)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        if !exists {
            let vectors_config = VectorsConfig::Params(
                VectorParamsBuilder::new(self.config.qdrant_dimensions as u64, Distance::Cosine)
                    .build(),
            );

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(collection).vectors_config(vectors_config),
                )
                .await
                .map_err(|e| StoreError::backend(e.to_string()))?;

            tracing::info!(
                target: TRACING_TARGET,
                collection = %collection,
                dimensions = self.config.qdrant_dimensions,
                "Created Qdrant collection"
            );
        }

        Ok(())
    }

    /// Extracts vector data from Qdrant's VectorsOutput.
    fn extract_vector(vectors: Option<qdrant_client::qdrant::VectorsOutput>) -> Option<Vec<f32>> {
        use qdrant_client::qdrant::vectors_output::VectorsOptions;

        vectors.and_then(|v| match v.vectors_options {
            #[allow(deprecated)]
            Some(VectorsOptions::Vector(vec)) => Some(vec.data),
            _ => None,
        })
    }

    /// Reads a string payload field.
    fn payload_str(payload: &HashMap<String, Value>, field: &str) -> Option<String> {
        use qdrant_client::qdrant::value::Kind;

        match payload.get(field)?.kind.as_ref()? {
            Kind::StringValue(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Reads the item id out of a point payload.
    fn payload_item_id(payload: &HashMap<String, Value>) -> Option<Uuid> {
        Self::payload_str(payload, PAYLOAD_ITEM_ID)
            .and_then(|s| Uuid::parse_str(&s).ok())
    }
}

#[async_trait]
impl EmbeddingIndex for QdrantIndex {
    async fn find_embedding(
        &self,
        kind: EmbeddingKind,
        item_id: Uuid,
    ) -> StoreResult<Option<EmbeddingRecord>> {
        let point_id = PointId::from(item_id.to_string());

        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(&self.config.qdrant_collection, vec![point_id])
                    .with_vectors(VectorsSelectorOptions::Enable(true))
                    .with_payload(SelectorOptions::Enable(true)),
            )
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let record = response.result.into_iter().find_map(|point| {
            let stored_kind = Self::payload_str(&point.payload, PAYLOAD_KIND)?;
            if stored_kind != kind.as_str() {
                return None;
            }

            let vector = Self::extract_vector(point.vectors)?;
            let model = Self::payload_str(&point.payload, PAYLOAD_MODEL).unwrap_or_default();

            Some(EmbeddingRecord::new(kind, item_id, vector).with_model(model))
        });

        Ok(record)
    }

    async fn nearest_neighbors(&self, query: &NeighborQuery) -> StoreResult<Vec<Neighbor>> {
        let mut search = SearchPointsBuilder::new(
            &self.config.qdrant_collection,
            query.vector.clone(),
            query.limit as u64,
        )
        .with_payload(SelectorOptions::Enable(true));

        if let Some(floor) = query.min_similarity {
            search = search.score_threshold(floor);
        }

        let must = vec![Condition::matches(
            PAYLOAD_KIND,
            query.kind.as_str().to_string(),
        )];
        let must_not = query
            .exclude_item
            .map(|item_id| vec![Condition::matches(PAYLOAD_ITEM_ID, item_id.to_string())])
            .unwrap_or_default();

        search = search.filter(Filter {
            must,
            must_not,
            ..Filter::default()
        });

        let response = self
            .client
            .search_points(search)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let neighbors = response
            .result
            .into_iter()
            .filter_map(|point| {
                let Some(item_id) = Self::payload_item_id(&point.payload) else {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        collection = %self.config.qdrant_collection,
                        "Skipping point without a parseable item_id payload"
                    );
                    return None;
                };

                Some(Neighbor {
                    item_id,
                    similarity: point.score,
                })
            })
            .collect();

        Ok(neighbors)
    }

    async fn upsert_embedding(&self, record: EmbeddingRecord) -> StoreResult<()> {
        if record.dimensions() != self.config.qdrant_dimensions {
            return Err(StoreError::dimension_mismatch(
                self.config.qdrant_dimensions,
                record.dimensions(),
            ));
        }

        let payload: HashMap<String, Value> = HashMap::from([
            (PAYLOAD_KIND.to_string(), record.kind.as_str().into()),
            (PAYLOAD_ITEM_ID.to_string(), record.item_id.to_string().into()),
            (PAYLOAD_MODEL.to_string(), record.model.clone().into()),
        ]);

        let point = PointStruct::new(record.item_id.to_string(), record.vector, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(
                &self.config.qdrant_collection,
                vec![point],
            ))
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(())
    }

    async fn remove_embedding(&self, _kind: EmbeddingKind, item_id: Uuid) -> StoreResult<()> {
        let ids = PointsIdsList {
            ids: vec![PointId::from(item_id.to_string())],
        };

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.config.qdrant_collection).points(ids),
            )
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .health_check()
            .await
            .map(|_| ())
            .map_err(|e| StoreError::connection(e.to_string()))
    }
}

impl std::fmt::Debug for QdrantIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantIndex")
            .field("url", &self.config.qdrant_url)
            .field("collection", &self.config.qdrant_collection)
            .finish_non_exhaustive()
    }
}
