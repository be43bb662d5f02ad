//! Recommendation assembler: resolves ranked neighbors to catalog records.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use crate::catalog::{CatalogProduct, ProductCatalog, RecommendedProduct};
use crate::engine::SimilarityMatch;

/// Tracing target for assembler operations.
const TRACING_TARGET: &str = "vitrina_recommend::assemble";

/// Resolves ranked similarity matches to full catalog records.
///
/// Fail-open like the engine: a failed or timed-out bulk lookup degrades
/// to an empty result set.
#[derive(Clone)]
pub struct RecommendationAssembler {
    catalog: Arc<dyn ProductCatalog>,
    store_timeout: Duration,
}

impl RecommendationAssembler {
    /// Creates a new assembler over a product catalog.
    pub fn new(catalog: Arc<dyn ProductCatalog>, store_timeout: Duration) -> Self {
        Self {
            catalog,
            store_timeout,
        }
    }

    /// Resolves matches to catalog records, preserving ranking order.
    ///
    /// All ids are resolved with a single bulk lookup. The catalog
    /// returns rows in arbitrary order, so the ranking is re-imposed by
    /// projecting the ranked id list through an id map. Ids without a
    /// live catalog row (deleted since the embedding was written) are
    /// dropped silently.
    pub async fn assemble(&self, matches: &[SimilarityMatch]) -> Vec<RecommendedProduct> {
        if matches.is_empty() {
            return Vec::new();
        }

        let ids: Vec<Uuid> = matches.iter().map(|m| m.item_id).collect();

        let products = match timeout(self.store_timeout, self.catalog.products_by_ids(&ids)).await
        {
            Ok(Ok(products)) => products,
            Ok(Err(error)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    ids = ids.len(),
                    error = %error,
                    "Catalog bulk lookup failed, degrading to empty result"
                );
                return Vec::new();
            }
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    ids = ids.len(),
                    timeout = ?self.store_timeout,
                    "Catalog bulk lookup timed out, degrading to empty result"
                );
                return Vec::new();
            }
        };

        let mut by_id: HashMap<Uuid, CatalogProduct> =
            products.into_iter().map(|p| (p.id, p)).collect();

        let resolved: Vec<RecommendedProduct> = matches
            .iter()
            .filter_map(|m| {
                by_id.remove(&m.item_id).map(|product| RecommendedProduct {
                    product,
                    similarity: m.similarity,
                })
            })
            .collect();

        if resolved.len() < matches.len() {
            tracing::debug!(
                target: TRACING_TARGET,
                requested = matches.len(),
                resolved = resolved.len(),
                "Dropped neighbors without a live catalog row"
            );
        }

        resolved
    }
}

impl std::fmt::Debug for RecommendationAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationAssembler")
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}
