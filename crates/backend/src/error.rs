//! Backend error taxonomy and HTTP mapping.
//!
//! Absent entities are not errors here - the RPC surface reports those with
//! typed `found`/`success` fields. Errors are reserved for caller mistakes
//! (malformed identifiers, zero quantities), storage failures, and the
//! cannot-find-user-just-created inconsistency.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::DatastoreError;

/// Failures surfaced by the store service.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A non-numeric entity id was supplied. Rejected before any storage
    /// call is attempted.
    #[error("malformed identifier: {0:?}")]
    MalformedId(String),

    /// A cart mutation asked for zero units.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The document store failed a read or write.
    #[error(transparent)]
    Datastore(#[from] DatastoreError),

    /// The store returned something that contradicts what was just written.
    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MalformedId(_) | Self::InvalidQuantity => StatusCode::BAD_REQUEST,
            Self::Datastore(_) | Self::Inconsistent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage and consistency details stay in the logs.
        let message = match &self {
            Self::MalformedId(_) | Self::InvalidQuantity => self.to_string(),
            Self::Datastore(_) | Self::Inconsistent(_) => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_owned()
            }
        };

        (status, message).into_response()
    }
}

/// Result type alias for `BackendError`.
pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors_map_to_bad_request() {
        let resp = BackendError::MalformedId("abc".to_owned()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = BackendError::InvalidQuantity.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let resp = BackendError::Inconsistent("missing".to_owned()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
