//! Request types deserialized by the handlers.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Per-request overrides for the recommendation query.
///
/// Absent fields fall back to the service-level defaults.
#[derive(Debug, Default, Clone, Copy, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecommendationParams {
    /// Maximum number of recommendations to return (1-50).
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    /// Minimum cosine similarity for a neighbor to qualify (-1.0-1.0).
    #[validate(range(min = -1.0, max = 1.0))]
    pub min_similarity: Option<f32>,
}
