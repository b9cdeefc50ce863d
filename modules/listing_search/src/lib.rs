//! Listing Search Module
//!
//! Natural-language filter extraction and filter sanitization for the
//! NxtOwner marketplace. Free text becomes a structured filter set, every
//! filter set is checked against the listing taxonomy before it reaches the
//! search backend.

// Public exports
pub mod contract;
pub use contract::{
    client::ListingSearchApi, error::SearchError, FilterSource, ListingPage, ListingSummary,
    ParsedQuery, ResolvedFilters, SearchFilters, SearchMode, SearchOutcome, SmartSearchOutcome,
    SortOrder,
};

pub mod module;
pub use module::ListingSearchModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
