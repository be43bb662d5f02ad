//! Recommendation engine configuration.
//!
//! The neighbor count and similarity floor were fixed constants in early
//! revisions; they are a configuration surface now, with service-level
//! defaults and bounded per-request overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;

/// Default number of neighbors returned per request.
pub const DEFAULT_LIMIT: usize = 4;

/// Upper bound for per-request neighbor limit overrides.
pub const MAX_LIMIT: usize = 50;

/// Default minimum cosine similarity for a neighbor to qualify.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.5;

/// Default store call timeout in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;

const MIN_STORE_TIMEOUT_SECS: u64 = 1;
const MAX_STORE_TIMEOUT_SECS: u64 = 60;

/// Service-level recommendation defaults.
///
/// ## Example
///
/// ```rust
/// use vitrina_recommend::RecommendConfig;
///
/// let config = RecommendConfig::new()
///     .with_limit(8)
///     .with_min_similarity(0.35);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecommendConfig {
    /// Default number of neighbors returned per request (1-50)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "recommend-limit",
            env = "RECOMMEND_LIMIT",
            default_value = "4"
        )
    )]
    pub recommend_limit: usize,

    /// Minimum cosine similarity for a neighbor to qualify (-1.0-1.0)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "recommend-min-similarity",
            env = "RECOMMEND_MIN_SIMILARITY",
            default_value = "0.5"
        )
    )]
    pub recommend_min_similarity: f32,

    /// Timeout for a single store call in seconds (1-60)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "recommend-store-timeout-secs",
            env = "RECOMMEND_STORE_TIMEOUT_SECS",
            default_value = "5"
        )
    )]
    pub recommend_store_timeout_secs: u64,
}

impl RecommendConfig {
    /// Creates a configuration with the service defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default neighbor limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.recommend_limit = limit;
        self
    }

    /// Sets the similarity floor.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.recommend_min_similarity = min_similarity;
        self
    }

    /// Sets the store call timeout in seconds.
    pub fn with_store_timeout_secs(mut self, secs: u64) -> Self {
        self.recommend_store_timeout_secs = secs;
        self
    }

    /// Returns the store call timeout as a [`Duration`].
    #[inline]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.recommend_store_timeout_secs)
    }

    /// Resolves per-request overrides against the configured defaults.
    ///
    /// Callers are expected to validate overrides before resolution;
    /// out-of-range values are clamped here as a last line of defense.
    pub fn resolve(
        &self,
        limit: Option<usize>,
        min_similarity: Option<f32>,
    ) -> SimilarityParams {
        let limit = limit
            .unwrap_or(self.recommend_limit)
            .clamp(1, MAX_LIMIT);
        let min_similarity = min_similarity
            .unwrap_or(self.recommend_min_similarity)
            .clamp(-1.0, 1.0);

        SimilarityParams {
            limit,
            min_similarity,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_LIMIT).contains(&self.recommend_limit) {
            return Err(format!(
                "recommend_limit must be between 1 and {}",
                MAX_LIMIT
            ));
        }

        if !(-1.0..=1.0).contains(&self.recommend_min_similarity) {
            return Err("recommend_min_similarity must be between -1.0 and 1.0".to_string());
        }

        if !(MIN_STORE_TIMEOUT_SECS..=MAX_STORE_TIMEOUT_SECS)
            .contains(&self.recommend_store_timeout_secs)
        {
            return Err(format!(
                "recommend_store_timeout_secs must be between {} and {}",
                MIN_STORE_TIMEOUT_SECS, MAX_STORE_TIMEOUT_SECS
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            limit = self.recommend_limit,
            min_similarity = self.recommend_min_similarity,
            store_timeout_secs = self.recommend_store_timeout_secs,
            "Recommendation configuration validated"
        );

        Ok(())
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            recommend_limit: DEFAULT_LIMIT,
            recommend_min_similarity: DEFAULT_MIN_SIMILARITY,
            recommend_store_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }
}

/// Resolved parameters for a single similarity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityParams {
    /// Maximum number of neighbors to return.
    pub limit: usize,
    /// Minimum cosine similarity for a neighbor to qualify.
    pub min_similarity: f32,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        RecommendConfig::default().resolve(None, None)
    }
}
