//! Database models for the storefront catalog.

mod product;
mod product_embedding;

pub use self::product::{NewProduct, Product, UpdateProduct};
pub use self::product_embedding::{NewProductEmbedding, ProductEmbedding, ScoredNeighbor};
