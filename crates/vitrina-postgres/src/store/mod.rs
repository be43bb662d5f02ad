//! Adapters implementing the recommendation engine's store ports.

mod catalog;
mod index;

use vitrina_recommend::StoreError;

pub use self::catalog::PgCatalog;
pub use self::index::PgEmbeddingIndex;

use crate::PgError;

/// Maps a database error onto the store port error taxonomy.
fn store_error(error: PgError) -> StoreError {
    match error {
        PgError::Timeout(_) => StoreError::timeout(error.to_string()),
        PgError::Connection(_) => StoreError::connection(error.to_string()),
        other => StoreError::backend(other.to_string()),
    }
}
