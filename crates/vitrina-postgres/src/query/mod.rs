//! Repository traits implemented for pooled database connections.

mod product;
mod product_embedding;

pub use self::product::ProductRepository;
pub use self::product_embedding::ProductEmbeddingRepository;
