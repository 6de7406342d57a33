// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse};

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Error bodies on this surface are plain text, never JSON. Success bodies
/// are JSON. Storefront and dashboard clients match on the raw strings.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request (missing/malformed required field)
    BadRequest(String),

    // 401 Unauthorized (no caller identity)
    Unauthenticated,

    // 403 Forbidden (caller does not own the target store)
    Unauthorized,

    // 404 Not Found
    NotFound(String),

    // 400 with a dependent-resource message; referential-integrity
    // failures are a client error on this surface, not a 409
    Conflict(String),

    // 500 Internal Server Error, generic body
    Internal,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthenticated => "Unauthenticated",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Internal => "Internal error",
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Missing required field, named the way the dashboard expects it
    pub fn required(field_label: &str) -> Self {
        ApiError::BadRequest(format!("{} is required", field_label))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    /// Convert an unexpected failure into the generic 500 response,
    /// logging the real error server-side under a handler tag
    /// (e.g. `[BILLBOARDS_POST]`). No internal details leak to the caller.
    pub fn internal(tag: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!("[{}] {}", tag, err);
        ApiError::Internal
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::Internal
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum: status code + raw text body
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), self.message().to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::required("Label").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("No products found").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages_are_plain_strings() {
        assert_eq!(ApiError::Unauthenticated.message(), "Unauthenticated");
        assert_eq!(ApiError::Unauthorized.message(), "Unauthorized");
        assert_eq!(ApiError::required("Label").message(), "Label is required");
        assert_eq!(ApiError::Internal.message(), "Internal error");
    }
}
