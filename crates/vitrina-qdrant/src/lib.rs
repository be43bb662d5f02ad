#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;

pub use backend::QdrantIndex;
pub use config::QdrantConfig;

/// Tracing target for Qdrant index operations.
pub const TRACING_TARGET: &str = "vitrina_qdrant";
