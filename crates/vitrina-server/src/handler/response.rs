//! Response types serialized by the handlers.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vitrina_recommend::RecommendedProduct;

/// HTTP error response representation.
///
/// Carries a stable snake_case error name, a user-safe message, and
/// optional debugging context. The status code rides along but is not
/// serialized.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'a, str>,
    /// Additional context for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "The request could not be processed due to invalid data",
        StatusCode::BAD_REQUEST,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred. Please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const MISSING_PATH_PARAM: Self = Self::new(
        "missing_path_param",
        "Invalid request: missing required parameters",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            context: None,
            status,
        }
    }

    /// Replaces the user-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches context, merging with any existing context.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Ranked recommendations for a source product.
///
/// The empty case is a normal response: it covers products without an
/// embedding, without qualifying neighbors, and every store-side
/// failure mode (the fail-open contract).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsResponse {
    /// Recommendations in descending similarity order.
    pub items: Vec<RecommendedProduct>,
    /// Number of items returned.
    pub total: usize,
}

/// Aggregated store health.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Whether both backing stores responded.
    pub is_healthy: bool,
    /// When the check ran.
    #[schema(value_type = String)]
    pub checked_at: jiff::Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_merges_context() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("store unavailable")
            .with_context("retried once");

        assert_eq!(
            response.context.as_deref(),
            Some("store unavailable; retried once")
        );
    }

    #[test]
    fn error_response_replaces_message() {
        let response = ErrorResponse::BAD_REQUEST.with_message("Invalid limit");
        assert_eq!(&response.message, "Invalid limit");
    }

    #[test]
    fn error_response_serialization_skips_status() {
        let response = ErrorResponse::BAD_REQUEST.with_context("ctx");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("name"));
        assert!(json.contains("message"));
        assert!(json.contains("context"));
        assert!(!json.contains("status"));
    }
}
