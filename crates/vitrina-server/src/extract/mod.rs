//! Extractors with structured rejections.
//!
//! Axum's default extractors reject with plain-text bodies; these
//! wrappers map rejections onto the service's [`ErrorResponse`] format
//! so validation failures look like every other error the API emits.
//!
//! [`ErrorResponse`]: crate::handler::ErrorResponse

mod path;
mod query;

pub use self::path::Path;
pub use self::query::Query;
