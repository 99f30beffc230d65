//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Server error type.
///
/// Every variant is answered with a bare status code and an empty body.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request body is not a valid todo.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A required path parameter is missing.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store could not serve the request.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] todo_store::TodoStoreError),
}

impl ServerError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MalformedInput(_) | ServerError::MissingParameter(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BackendUnavailable(_) | ServerError::Store(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        status.into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
