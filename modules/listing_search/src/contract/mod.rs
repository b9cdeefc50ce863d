//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::ListingSearchApi;
pub use error::SearchError;
pub use model::{
    FilterSource, ListingPage, ListingSummary, ParsedQuery, ResolvedFilters, SearchFilters,
    SearchMode, SearchOutcome, SmartSearchOutcome, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
