//! Error types for constructing the HTTP client.
//!
//! Failures of individual calls are reported as
//! [`aadya_core::backend::BackendError`] so the session can treat every
//! backend the same way. Only setup problems surface as [`ClientError`].

/// Errors that can occur while building an [`HttpBackend`](crate::HttpBackend).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured API URL cannot be used as a base for endpoints.
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl {
        /// The configured URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
