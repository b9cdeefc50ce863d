//! Ordered filter resolution: generative extractor first, pattern parser second
//!
//! Both sources feed the same sanitizer, so a model answer is never trusted
//! more than a regex match.

use super::parser::QueryParser;
use super::sanitizer::{FilterSanitizer, RawFilters};
use crate::contract::{FilterSource, ResolvedFilters, SearchMode};
use async_trait::async_trait;
use std::sync::Arc;

/// Upstream source of raw, unvalidated filter objects
#[async_trait]
pub trait FilterExtractor: Send + Sync {
    /// Produce a raw filter object for `text`, or `None` when nothing usable
    /// came back
    async fn extract(&self, text: &str, mode: SearchMode) -> anyhow::Result<Option<serde_json::Value>>;
}

/// Resolves free text into sanitized filters through the ordered fallback
#[derive(Clone)]
pub struct FilterResolver {
    parser: Arc<QueryParser>,
    sanitizer: Arc<FilterSanitizer>,
    extractor: Option<Arc<dyn FilterExtractor>>,
}

impl FilterResolver {
    pub fn new(
        parser: Arc<QueryParser>,
        sanitizer: Arc<FilterSanitizer>,
        extractor: Option<Arc<dyn FilterExtractor>>,
    ) -> Self {
        Self {
            parser,
            sanitizer,
            extractor,
        }
    }

    pub async fn resolve(&self, text: &str, mode: SearchMode) -> ResolvedFilters {
        let parsed = self.parser.parse(text, mode);

        if let Some(extractor) = &self.extractor {
            match extractor.extract(text, mode).await {
                Ok(Some(value)) => {
                    let mut raw = RawFilters::from_value(value);
                    // Free text stays with the pattern path; the model only
                    // contributes structured fields
                    raw.remove("query");
                    raw.insert("mode", mode.as_str());
                    let filters = self.sanitizer.sanitize(&raw);
                    if filters.has_structured_filters() {
                        return ResolvedFilters {
                            filters,
                            source: FilterSource::Ai,
                            suggested_mode: parsed.suggested_mode,
                        };
                    }
                    tracing::debug!("extractor returned no usable filters, falling back to patterns");
                }
                Ok(None) => {
                    tracing::debug!("extractor returned nothing, falling back to patterns");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "filter extractor failed, falling back to patterns");
                }
            }
        }

        let mut raw = RawFilters::from(&parsed);
        raw.insert("mode", mode.as_str());
        ResolvedFilters {
            filters: self.sanitizer.sanitize(&raw),
            source: FilterSource::Pattern,
            suggested_mode: parsed.suggested_mode,
        }
    }
}
