//! Domain service - search pipeline orchestration

use super::parser::QueryParser;
use super::repository::ListingSearchRepository;
use super::sanitizer::{FilterSanitizer, RawFilters, SanitizerLimits};
use super::strategy::{FilterExtractor, FilterResolver};
use super::taxonomy::Taxonomy;
use crate::contract::{
    ListingPage, ParsedQuery, ResolvedFilters, SearchError, SearchFilters, SearchMode,
    SearchOutcome, SmartSearchOutcome,
};
use std::sync::Arc;

/// Domain service for listing search
pub struct Service {
    taxonomy: Arc<Taxonomy>,
    parser: Arc<QueryParser>,
    sanitizer: Arc<FilterSanitizer>,
    resolver: FilterResolver,
    repository: Arc<dyn ListingSearchRepository>,
}

impl Service {
    /// Create a new service instance
    ///
    /// Fails only if the taxonomy keywords cannot be compiled into matchers.
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        limits: SanitizerLimits,
        repository: Arc<dyn ListingSearchRepository>,
        extractor: Option<Arc<dyn FilterExtractor>>,
    ) -> anyhow::Result<Self> {
        let parser = Arc::new(QueryParser::new(&taxonomy)?);
        let sanitizer = Arc::new(FilterSanitizer::new(taxonomy.clone(), limits));
        let resolver = FilterResolver::new(parser.clone(), sanitizer.clone(), extractor);
        Ok(Self {
            taxonomy,
            parser,
            sanitizer,
            resolver,
            repository,
        })
    }

    /// The taxonomy this service validates against
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Extract structured filters from free text
    pub fn parse_query(&self, text: &str, mode: SearchMode) -> ParsedQuery {
        self.parser.parse(text, mode)
    }

    /// Validate an untrusted filter object
    pub fn sanitize_filters(&self, raw: &RawFilters) -> SearchFilters {
        self.sanitizer.sanitize(raw)
    }

    /// Derive filters from free text via the extractor/parser fallback
    pub async fn resolve_filters(&self, text: &str, mode: SearchMode) -> ResolvedFilters {
        self.resolver.resolve(text, mode).await
    }

    /// Search with explicit filters from a query string or JSON body
    pub async fn search(&self, raw: &RawFilters) -> Result<SearchOutcome, SearchError> {
        let filters = self.sanitizer.sanitize(raw);
        let (filters, results) = self.execute(filters).await?;
        Ok(SearchOutcome { filters, results })
    }

    /// Search from free text.
    ///
    /// Non-empty text that yields no structured filter is reported as
    /// `NoFiltersInferred` instead of running an unfiltered search.
    pub async fn smart_search(
        &self,
        text: &str,
        mode: SearchMode,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<SmartSearchOutcome, SearchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SearchError::Validation {
                message: "query cannot be empty".to_string(),
            });
        }

        let mut resolved = self.resolver.resolve(text, mode).await;
        if !resolved.filters.has_structured_filters() {
            tracing::info!(
                mode = %mode,
                suggested_mode = ?resolved.suggested_mode,
                "could not infer filters from query"
            );
            return Err(SearchError::NoFiltersInferred {
                query: text.to_string(),
                suggested_mode: resolved.suggested_mode,
            });
        }

        self.sanitizer
            .apply_paging(&mut resolved.filters, page, page_size);
        let (filters, results) = self.execute(resolved.filters).await?;
        resolved.filters = filters;

        tracing::info!(
            source = resolved.source.as_str(),
            total = results.total,
            "smart search completed"
        );
        Ok(SmartSearchOutcome { resolved, results })
    }

    async fn execute(&self, filters: SearchFilters) -> Result<(SearchFilters, ListingPage), SearchError> {
        let filters = self.sanitizer.validate_taxonomy(filters);
        let results = self.repository.search(&filters).await.map_err(|e| {
            tracing::error!(error = ?e, "listing search backend failed");
            SearchError::Backend {
                message: "listing search is temporarily unavailable".to_string(),
            }
        })?;
        Ok((filters, results))
    }
}
