//! Product model for PostgreSQL database operations.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;
use vitrina_recommend::CatalogProduct;

use crate::schema::products;

/// A storefront catalog product row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    /// Unique product identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Description shown on the product page.
    pub description: String,
    /// Unit price in the listed currency.
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
    pub created_at: Timestamp,
    /// Timestamp when the product was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new product.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProduct {
    /// Display title (required).
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Unit price (required).
    pub price: BigDecimal,
    /// Currency code.
    pub currency: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Primary image URL.
    pub image_url: Option<String>,
    /// Product video URL.
    pub video_url: Option<String>,
    /// Owning seller (required).
    pub seller_id: Uuid,
    /// Initial stock.
    pub stock_quantity: Option<i32>,
    /// Visibility flag.
    pub is_published: Option<bool>,
}

/// Data for updating a product.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateProduct {
    /// Display title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Option<BigDecimal>,
    /// Category slug.
    pub category: Option<String>,
    /// Primary image URL.
    pub image_url: Option<String>,
    /// Product video URL.
    pub video_url: Option<String>,
    /// Stock level.
    pub stock_quantity: Option<i32>,
    /// Visibility flag.
    pub is_published: Option<bool>,
}

impl Product {
    /// Returns whether the product has units in stock.
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

impl From<Product> for CatalogProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            currency: product.currency,
            category: product.category,
            image_url: product.image_url,
            video_url: product.video_url,
            seller_id: product.seller_id,
            stock_quantity: product.stock_quantity,
            is_published: product.is_published,
            created_at: product.created_at.into(),
            updated_at: product.updated_at.into(),
        }
    }
}
