//! Repository traits for data access
//!
//! The search backend lives outside this module (hosted database in
//! production). Implementations are in infra/storage.

use crate::contract::{ListingPage, SearchFilters};
use anyhow::Result;
use async_trait::async_trait;

/// Executes validated searches against the listing store
#[async_trait]
pub trait ListingSearchRepository: Send + Sync {
    /// Return the page of listings matching `filters`.
    ///
    /// `filters` has already passed sanitization and the taxonomy re-check.
    async fn search(&self, filters: &SearchFilters) -> Result<ListingPage>;
}
