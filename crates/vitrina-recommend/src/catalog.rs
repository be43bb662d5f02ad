//! Catalog store port and the product records it resolves.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreResult;

/// A storefront catalog product.
///
/// Carries every catalog field a recommendation surfaces to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(utoipa::ToSchema))]
pub struct CatalogProduct {
    /// Unique product identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Description shown on the product page.
    pub description: String,
    /// Unit price in the listed currency.
    #[cfg_attr(feature = "schema", schema(value_type = String))]
    pub price: BigDecimal,
    /// ISO 4217 currency code, lowercase.
    pub currency: String,
    /// Category slug, if categorized.
    pub category: Option<String>,
    /// Primary image URL.
    pub image_url: Option<String>,
    /// Product video URL, if the listing has one.
    pub video_url: Option<String>,
    /// The seller account that owns the listing.
    pub seller_id: Uuid,
    /// Units currently in stock.
    pub stock_quantity: i32,
    /// Whether the listing is visible in the storefront.
    pub is_published: bool,
    /// Timestamp when the product was created.
    #[cfg_attr(feature = "schema", schema(value_type = String))]
    pub created_at: jiff::Timestamp,
    /// Timestamp when the product was last updated.
    #[cfg_attr(feature = "schema", schema(value_type = String))]
    pub updated_at: jiff::Timestamp,
}

/// A catalog product enriched with its similarity to the source item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(utoipa::ToSchema))]
pub struct RecommendedProduct {
    /// The resolved catalog record.
    #[serde(flatten)]
    pub product: CatalogProduct,
    /// Cosine similarity to the source product, in `[-1, 1]`.
    pub similarity: f32,
}

/// Trait for catalog store backends.
///
/// The catalog is read-only from the recommendation core's perspective.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Resolves product ids to catalog records in a single bulk lookup.
    ///
    /// Result order is unspecified; ids without a live catalog row are
    /// simply absent from the result.
    async fn products_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<CatalogProduct>>;

    /// Checks backend connectivity.
    async fn ping(&self) -> StoreResult<()>;
}
