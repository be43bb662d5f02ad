//! Catalog port backed by the `products` table.

use async_trait::async_trait;
use uuid::Uuid;
use vitrina_recommend::{CatalogProduct, ProductCatalog, StoreResult};

use super::store_error;
use crate::PgClient;
use crate::query::ProductRepository;

/// [`ProductCatalog`] implementation over the relational catalog.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    client: PgClient,
}

impl PgCatalog {
    /// Creates a catalog adapter over a database client.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductCatalog for PgCatalog {
    async fn products_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<CatalogProduct>> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;

        let products = conn
            .find_products_by_ids(ids)
            .await
            .map_err(store_error)?;

        Ok(products.into_iter().map(CatalogProduct::from).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client.ping().await.map_err(store_error)
    }
}
