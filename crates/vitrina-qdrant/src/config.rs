//! Qdrant backend configuration.

use serde::{Deserialize, Serialize};

/// Default Qdrant gRPC endpoint for development.
const DEFAULT_URL: &str = "http://localhost:6334";

/// Default collection holding product embeddings.
const DEFAULT_COLLECTION: &str = "vitrina-embeddings";

/// Default embedding dimensionality (text-embedding-3-small).
const DEFAULT_DIMENSIONS: usize = 1536;

/// Qdrant connection and collection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
#[must_use = "config does nothing unless you use it"]
pub struct QdrantConfig {
    /// Qdrant gRPC endpoint URL
    #[cfg_attr(
        feature = "config",
        arg(long = "qdrant-url", env = "QDRANT_URL", default_value = DEFAULT_URL)
    )]
    pub qdrant_url: String,

    /// Qdrant API key (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "qdrant-api-key", env = "QDRANT_API_KEY")
    )]
    pub qdrant_api_key: Option<String>,

    /// Collection holding the embeddings
    #[cfg_attr(
        feature = "config",
        arg(
            long = "qdrant-collection",
            env = "QDRANT_COLLECTION",
            default_value = DEFAULT_COLLECTION
        )
    )]
    pub qdrant_collection: String,

    /// Embedding dimensionality
    #[cfg_attr(
        feature = "config",
        arg(
            long = "qdrant-dimensions",
            env = "QDRANT_DIMENSIONS",
            default_value = "1536"
        )
    )]
    pub qdrant_dimensions: usize,
}

impl QdrantConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.qdrant_api_key = Some(api_key.into());
        self
    }

    /// Sets the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.qdrant_collection = collection.into();
        self
    }

    /// Sets the embedding dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.qdrant_dimensions = dimensions;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.qdrant_url.is_empty() {
            return Err("qdrant_url cannot be empty".to_string());
        }

        if self.qdrant_collection.is_empty() {
            return Err("qdrant_collection cannot be empty".to_string());
        }

        if self.qdrant_dimensions == 0 {
            return Err("qdrant_dimensions must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_URL.to_string(),
            qdrant_api_key: None,
            qdrant_collection: DEFAULT_COLLECTION.to_string(),
            qdrant_dimensions: DEFAULT_DIMENSIONS,
        }
    }
}
