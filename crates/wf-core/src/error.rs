//! # ApiError
//!
//! Centralized error handling for the Wayfarer client.
//! Maps the failure modes of both backends onto one taxonomy so the
//! UI layer never has to care which mode answered the call.

use thiserror::Error;

/// The primary error type for all client operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input, caught before any network round-trip
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, invalid, or expired token. Fatal to the call, never retried.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Duplicate unique key (e.g., username or email already taken)
    #[error("conflict: {0}")]
    Conflict(String),

    /// A read expected an entity that does not exist
    #[error("{0} not found: {1}")]
    NotFound(String, String),

    /// Network-level failure: no response at all. The dispatch layer may
    /// answer this with a one-shot mock fallback.
    #[error("network unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-success status. `message` carries the
    /// normalized human-readable text extracted from the response.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// No mock handler matched the (method, path) pair. This is a
    /// programming-error signal meant to be caught in development and test,
    /// never a user-facing condition.
    #[error("no handler for {0} {1}")]
    NoHandler(String, String),

    /// Infrastructure failure inside a backend (storage I/O, bad JSON)
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for Wayfarer client logic.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// True when the dispatch layer is allowed to retry the call against the
    /// mock backend. Only transport failures qualify; HTTP status errors are
    /// real answers and must surface as-is.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("json: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_is_the_only_fallback_trigger() {
        assert!(ApiError::Transport("connection refused".into()).is_transport());
        assert!(!ApiError::Http { status: 500, message: "boom".into() }.is_transport());
        assert!(!ApiError::Unauthorized("expired".into()).is_transport());
    }

    #[test]
    fn display_is_a_single_human_readable_message() {
        let e = ApiError::Http { status: 409, message: "Username already taken".into() };
        assert_eq!(e.to_string(), "Username already taken");

        let e = ApiError::NoHandler("POST".into(), "favorites/addd".into());
        assert_eq!(e.to_string(), "no handler for POST favorites/addd");
    }
}
