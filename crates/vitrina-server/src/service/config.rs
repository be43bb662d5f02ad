//! Service configuration and store wiring.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vitrina_postgres::{PgClient, PgConfig};
use vitrina_postgres::store::{PgCatalog, PgEmbeddingIndex};
use vitrina_qdrant::{QdrantConfig, QdrantIndex};
use vitrina_recommend::memory::{MemoryCatalog, MemoryIndex};
use vitrina_recommend::{EmbeddingIndex, ProductCatalog, RecommendConfig};

use crate::service::{Result, ServiceError, TRACING_TARGET};

/// Default embedding dimensionality for the in-memory backend.
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// Embedding store backend selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum VectorBackend {
    /// pgvector table colocated with the catalog (default).
    PgVector,
    /// External Qdrant collection; the catalog stays in Postgres.
    Qdrant,
    /// In-process exact-scan stores for development and tests.
    Memory,
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Embedding store backend
    #[cfg_attr(
        feature = "config",
        arg(
            long = "vector-backend",
            env = "VECTOR_BACKEND",
            value_enum,
            default_value = "pg-vector"
        )
    )]
    pub vector_backend: VectorBackend,

    /// Embedding dimensionality for the in-memory backend
    #[cfg_attr(
        feature = "config",
        arg(
            long = "embedding-dimensions",
            env = "EMBEDDING_DIMENSIONS",
            default_value = "1536"
        )
    )]
    pub embedding_dimensions: usize,

    /// Relational database settings.
    #[serde(flatten)]
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres: PgConfig,

    /// Qdrant settings, used when the backend is `qdrant`.
    #[serde(flatten)]
    #[cfg_attr(feature = "config", command(flatten))]
    pub qdrant: QdrantConfig,

    /// Recommendation engine defaults.
    #[serde(flatten)]
    #[cfg_attr(feature = "config", command(flatten))]
    pub recommend: RecommendConfig,
}

impl ServiceConfig {
    /// Validates every configuration group.
    pub fn validate(&self) -> Result<()> {
        self.postgres
            .validate()
            .map_err(|e| ServiceError::config("Invalid Postgres configuration").with_source(e))?;

        self.qdrant.validate().map_err(ServiceError::config)?;
        self.recommend.validate().map_err(ServiceError::config)?;

        if self.embedding_dimensions == 0 {
            return Err(ServiceError::config(
                "embedding_dimensions must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Connects to Postgres and applies pending migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let client = self.postgres.clone().build().map_err(|e| {
            ServiceError::internal("postgres", "Failed to create database client").with_source(e)
        })?;

        client.run_pending_migrations().await.map_err(|e| {
            ServiceError::internal("postgres", "Failed to apply database migrations")
                .with_source(e)
        })?;

        Ok(client)
    }

    /// Connects the catalog and embedding stores per the configured
    /// backend.
    pub async fn connect_stores(
        &self,
    ) -> Result<(Arc<dyn ProductCatalog>, Arc<dyn EmbeddingIndex>)> {
        tracing::info!(
            target: TRACING_TARGET,
            backend = %self.vector_backend,
            "Connecting stores"
        );

        match self.vector_backend {
            VectorBackend::PgVector => {
                let client = self.connect_postgres().await?;
                Ok((
                    Arc::new(PgCatalog::new(client.clone())),
                    Arc::new(PgEmbeddingIndex::new(client)),
                ))
            }
            VectorBackend::Qdrant => {
                let client = self.connect_postgres().await?;
                let index = QdrantIndex::connect(self.qdrant.clone()).await.map_err(|e| {
                    ServiceError::external("qdrant", "Failed to connect to Qdrant")
                        .with_source(e)
                })?;
                Ok((Arc::new(PgCatalog::new(client)), Arc::new(index)))
            }
            VectorBackend::Memory => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    "Using in-memory stores; data will not survive a restart"
                );
                Ok((
                    Arc::new(MemoryCatalog::new()),
                    Arc::new(MemoryIndex::new(self.embedding_dimensions)),
                ))
            }
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vector_backend: VectorBackend::PgVector,
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            postgres: PgConfig::default(),
            qdrant: QdrantConfig::default(),
            recommend: RecommendConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_recommend_settings() {
        let config = ServiceConfig {
            recommend: RecommendConfig::new().with_limit(0),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_dimensions() {
        let config = ServiceConfig {
            embedding_dimensions: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn backend_names_round_trip() {
        assert_eq!(VectorBackend::PgVector.to_string(), "pg_vector");
        assert_eq!(
            "qdrant".parse::<VectorBackend>().unwrap(),
            VectorBackend::Qdrant
        );
    }
}
