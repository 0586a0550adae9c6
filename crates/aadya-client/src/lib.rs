//! HTTP client for the Aadya assessment backend.
//!
//! [`HttpBackend`] implements [`aadya_core::backend::AssessmentBackend`]
//! over the backend's REST API using `reqwest`.
//!
//! # Modules
//!
//! - [`error`] -- Client construction errors.
//! - [`http`] -- The `reqwest` backend and its endpoint table.
//! - [`parse`] -- Response body parsing.

pub mod error;
pub mod http;
pub mod parse;

pub use error::ClientError;
pub use http::HttpBackend;
