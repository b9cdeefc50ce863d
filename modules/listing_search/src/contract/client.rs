//! Native client trait for inter-module communication
//!
//! Other modules (listing pages, dashboards) use this trait to run searches.
//! NO HTTP - direct function calls.

use super::{
    error::SearchError,
    model::{ParsedQuery, SearchFilters, SearchMode, SearchOutcome, SmartSearchOutcome},
};
use async_trait::async_trait;

/// Listing search API for inter-module communication
#[async_trait]
pub trait ListingSearchApi: Send + Sync {
    /// Extract structured filters from free text without searching
    async fn parse_query(&self, text: &str, mode: SearchMode) -> Result<ParsedQuery, SearchError>;

    /// Sanitize an untyped filter object (query string or JSON body)
    async fn sanitize_filters(&self, raw: serde_json::Value) -> Result<SearchFilters, SearchError>;

    /// Search with explicit, untrusted filters
    async fn search(&self, raw: serde_json::Value) -> Result<SearchOutcome, SearchError>;

    /// Search from free text, deriving filters first
    async fn smart_search(
        &self,
        text: &str,
        mode: SearchMode,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<SmartSearchOutcome, SearchError>;
}
