//! Products repository for catalog database operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewProduct, Product, UpdateProduct};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for product catalog operations.
pub trait ProductRepository {
    /// Creates a new product.
    fn create_product(
        &mut self,
        new_product: NewProduct,
    ) -> impl Future<Output = PgResult<Product>> + Send;

    /// Finds a product by its unique identifier.
    fn find_product_by_id(
        &mut self,
        product_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Product>>> + Send;

    /// Resolves a set of product ids in a single query.
    ///
    /// Result order is unspecified; missing ids are simply absent.
    fn find_products_by_ids(
        &mut self,
        product_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<Product>>> + Send;

    /// Lists published products, newest first.
    fn list_published_products(
        &mut self,
        limit: i64,
        offset: i64,
    ) -> impl Future<Output = PgResult<Vec<Product>>> + Send;

    /// Updates a product with new data.
    fn update_product(
        &mut self,
        product_id: Uuid,
        updates: UpdateProduct,
    ) -> impl Future<Output = PgResult<Product>> + Send;

    /// Deletes a product. Embeddings cascade at the schema level.
    fn delete_product(&mut self, product_id: Uuid)
    -> impl Future<Output = PgResult<()>> + Send;
}

impl ProductRepository for PgConnection {
    async fn create_product(&mut self, new_product: NewProduct) -> PgResult<Product> {
        use schema::products;

        let product = diesel::insert_into(products::table)
            .values(&new_product)
            .returning(Product::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(product)
    }

    async fn find_product_by_id(&mut self, product_id: Uuid) -> PgResult<Option<Product>> {
        use schema::products::{self, dsl};

        let product = products::table
            .filter(dsl::id.eq(product_id))
            .select(Product::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(product)
    }

    async fn find_products_by_ids(&mut self, product_ids: &[Uuid]) -> PgResult<Vec<Product>> {
        use schema::products::{self, dsl};

        if product_ids.is_empty() {
            return Ok(vec![]);
        }

        let products = products::table
            .filter(dsl::id.eq_any(product_ids))
            .select(Product::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(products)
    }

    async fn list_published_products(
        &mut self,
        limit: i64,
        offset: i64,
    ) -> PgResult<Vec<Product>> {
        use schema::products::{self, dsl};

        let products = products::table
            .filter(dsl::is_published.eq(true))
            .order(dsl::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(Product::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(products)
    }

    async fn update_product(
        &mut self,
        product_id: Uuid,
        updates: UpdateProduct,
    ) -> PgResult<Product> {
        use schema::products::{self, dsl};

        let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());

        let product = diesel::update(products::table.filter(dsl::id.eq(product_id)))
            .set((&updates, dsl::updated_at.eq(now)))
            .returning(Product::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(product)
    }

    async fn delete_product(&mut self, product_id: Uuid) -> PgResult<()> {
        use schema::products::{self, dsl};

        diesel::delete(products::table.filter(dsl::id.eq(product_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
