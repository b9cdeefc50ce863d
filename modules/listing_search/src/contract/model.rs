//! Contract models for listing search
//!
//! These models are transport-agnostic and used for inter-module communication.
//! Only the two closed vocabularies (`SearchMode`, `SortOrder`) carry serde
//! derives, because the taxonomy configuration refers to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of listings per page
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Hard ceiling for listings per page
pub const MAX_PAGE_SIZE: u32 = 60;

/// Marketplace side a search is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Brick-and-mortar businesses (gas stations, restaurants, trades)
    Operational,
    /// Online businesses (SaaS, e-commerce, content)
    Digital,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Digital => "digital",
        }
    }

    /// Parse a mode name, case-insensitive. Unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "operational" => Some(Self::Operational),
            "digital" => Some(Self::Digital),
            _ => None,
        }
    }

    /// The opposite side of the marketplace
    pub fn other(self) -> Self {
        match self {
            Self::Operational => Self::Digital,
            Self::Digital => Self::Operational,
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result ordering accepted by the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Newest,
    PriceAsc,
    PriceDesc,
    RevenueDesc,
    EbitdaDesc,
    MrrDesc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::RevenueDesc => "revenue_desc",
            Self::EbitdaDesc => "ebitda_desc",
            Self::MrrDesc => "mrr_desc",
        }
    }

    /// Parse a sort key. Accepts snake_case or kebab-case, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "newest" => Some(Self::Newest),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "revenue_desc" => Some(Self::RevenueDesc),
            "ebitda_desc" => Some(Self::EbitdaDesc),
            "mrr_desc" => Some(Self::MrrDesc),
            _ => None,
        }
    }
}

/// Structured filters extracted from a free-text query
///
/// Every field is optional: a pattern that did not match leaves its field
/// absent. `query` is only populated when nothing structured was found, so
/// the caller can fall back to full-text search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub category_code: Option<String>,
    pub subcategory_code: Option<String>,
    pub location: Option<String>,
    pub min_ebitda: Option<f64>,
    pub min_mrr: Option<f64>,
    pub min_revenue: Option<f64>,
    pub max_price: Option<f64>,
    /// Churn ceiling in percent
    pub churn_rate: Option<f64>,
    /// Set when the query vocabulary belongs to the other marketplace side
    pub suggested_mode: Option<SearchMode>,
    /// Original query, kept for full-text fallback
    pub query: Option<String>,
}

impl ParsedQuery {
    /// Whether any filter beyond the mode hint and fallback text was extracted
    pub fn has_structured_fields(&self) -> bool {
        self.category_code.is_some()
            || self.subcategory_code.is_some()
            || self.location.is_some()
            || self.min_ebitda.is_some()
            || self.min_mrr.is_some()
            || self.min_revenue.is_some()
            || self.max_price.is_some()
            || self.churn_rate.is_some()
    }
}

/// Validated filter set, safe to hand to the search backend
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    /// Free-text search terms
    pub query: Option<String>,
    pub mode: Option<SearchMode>,
    /// Canonical category code
    pub category: Option<String>,
    /// Canonical subcategory code, only present with its parent category
    pub subcategory: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_revenue: Option<f64>,
    pub min_ebitda: Option<f64>,
    pub min_mrr: Option<f64>,
    /// Churn ceiling in percent (0..=100)
    pub churn_rate: Option<f64>,
    pub verified_only: Option<bool>,
    pub sort: Option<SortOrder>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: None,
            mode: None,
            category: None,
            subcategory: None,
            location: None,
            min_price: None,
            max_price: None,
            min_revenue: None,
            min_ebitda: None,
            min_mrr: None,
            churn_rate: None,
            verified_only: None,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchFilters {
    /// Whether the set narrows results beyond text, mode, ordering and paging
    pub fn has_structured_filters(&self) -> bool {
        self.category.is_some()
            || self.subcategory.is_some()
            || self.location.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.min_revenue.is_some()
            || self.min_ebitda.is_some()
            || self.min_mrr.is_some()
            || self.churn_rate.is_some()
            || self.verified_only == Some(true)
    }

    /// Zero-based offset of the first item on the requested page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }
}

/// Which source produced a resolved filter set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    /// Generative model output, sanitized
    Ai,
    /// Keyword and pattern extraction, sanitized
    Pattern,
}

impl FilterSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Pattern => "pattern",
        }
    }
}

/// Filters derived from free text through the ordered fallback
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilters {
    pub filters: SearchFilters,
    pub source: FilterSource,
    pub suggested_mode: Option<SearchMode>,
}

/// Teaser-level projection of a listing, as returned by search
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    /// Public summary shown before NDA approval
    pub teaser: Option<String>,
    pub mode: SearchMode,
    pub category_code: String,
    pub subcategory_code: Option<String>,
    pub location: Option<String>,
    pub asking_price: Option<f64>,
    pub revenue: Option<f64>,
    pub ebitda: Option<f64>,
    pub mrr: Option<f64>,
    pub churn_rate: Option<f64>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub items: Vec<ListingSummary>,
    /// Total matches across all pages
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

/// Outcome of a search over explicit filters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Filters actually applied after sanitization
    pub filters: SearchFilters,
    pub results: ListingPage,
}

/// Outcome of a natural-language search
#[derive(Debug, Clone, PartialEq)]
pub struct SmartSearchOutcome {
    pub resolved: ResolvedFilters,
    pub results: ListingPage,
}
