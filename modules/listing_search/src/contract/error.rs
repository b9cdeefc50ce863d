//! Contract error types for listing search
//!
//! These errors are transport-agnostic and used for inter-module communication.
//! Filter extraction and sanitization never fail; only orchestration does.

use super::model::SearchMode;

/// Listing search domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Free text was given but no usable filter could be derived from it
    #[error("Could not infer filters from query '{query}'")]
    NoFiltersInferred {
        /// The query as received
        query: String,
        /// Marketplace side the query vocabulary points at, if different
        suggested_mode: Option<SearchMode>,
    },
    /// Request rejected before reaching the backend
    #[error("Validation error: {message}")]
    Validation {
        /// Validation error message
        message: String,
    },
    /// The search backend failed
    #[error("Search backend error: {message}")]
    Backend {
        /// Backend error summary
        message: String,
    },
    /// Internal error
    #[error("Internal error")]
    Internal,
}
