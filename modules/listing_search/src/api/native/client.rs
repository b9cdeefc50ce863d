//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    ListingSearchApi, ParsedQuery, SearchError, SearchFilters, SearchMode, SearchOutcome,
    SmartSearchOutcome,
};
use crate::domain::sanitizer::RawFilters;
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that calls the domain service directly, without HTTP
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ListingSearchApi for NativeClient {
    async fn parse_query(&self, text: &str, mode: SearchMode) -> Result<ParsedQuery, SearchError> {
        Ok(self.service.parse_query(text, mode))
    }

    async fn sanitize_filters(&self, raw: serde_json::Value) -> Result<SearchFilters, SearchError> {
        Ok(self.service.sanitize_filters(&RawFilters::from_value(raw)))
    }

    async fn search(&self, raw: serde_json::Value) -> Result<SearchOutcome, SearchError> {
        self.service.search(&RawFilters::from_value(raw)).await
    }

    async fn smart_search(
        &self,
        text: &str,
        mode: SearchMode,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<SmartSearchOutcome, SearchError> {
        self.service.smart_search(text, mode, page, page_size).await
    }
}
