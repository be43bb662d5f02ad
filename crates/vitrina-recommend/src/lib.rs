#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod memory;

mod assemble;
mod catalog;
mod config;
mod engine;
mod error;
mod index;
mod recommender;

pub use assemble::RecommendationAssembler;
pub use catalog::{CatalogProduct, ProductCatalog, RecommendedProduct};
pub use config::{RecommendConfig, SimilarityParams};
pub use engine::{SimilarityEngine, SimilarityMatch};
pub use error::{StoreError, StoreResult};
pub use index::{EmbeddingIndex, EmbeddingKind, EmbeddingRecord, Neighbor, NeighborQuery};
pub use recommender::Recommender;

/// Tracing target for recommendation operations.
pub const TRACING_TARGET: &str = "vitrina_recommend";
