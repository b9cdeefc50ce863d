//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Marketplace side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchModeDto {
    /// Brick-and-mortar businesses
    #[default]
    Operational,
    /// Online businesses
    Digital,
}

// ===== Parse =====

/// Free-text parse request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ParseQueryRequest {
    #[schema(example = "gas station in Ontario with EBITDA over 500k")]
    pub query: String,

    #[serde(default)]
    pub mode: SearchModeDto,
}

/// Filters extracted from free text, before sanitization
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQueryDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ebitda: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_mrr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub churn_rate: Option<f64>,
    /// Set when the text reads like the other marketplace side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_mode: Option<SearchModeDto>,
    /// Original text, kept only when nothing structured was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

// ===== Filters and results =====

/// Sanitized filter set as applied to the search
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchFiltersDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SearchModeDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ebitda: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_mrr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub churn_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "price_asc")]
    pub sort: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

/// Listing teaser as shown in search results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingDto {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teaser: Option<String>,
    pub mode: SearchModeDto,
    pub category_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asking_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebitda: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub churn_rate: Option<f64>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingPageDto {
    pub items: Vec<ListingDto>,
    /// Matches across all pages
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

/// Explicit-filter search response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub filters: SearchFiltersDto,
    pub results: ListingPageDto,
}

// ===== Smart search =====

/// Free-text search request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SmartSearchRequest {
    #[schema(example = "SaaS with MRR over 10k and churn under 5%")]
    pub query: String,

    #[serde(default)]
    pub mode: SearchModeDto,

    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Free-text search response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SmartSearchResponse {
    pub filters: SearchFiltersDto,
    /// Which extractor produced the filters: `ai` or `pattern`
    #[schema(example = "pattern")]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_mode: Option<SearchModeDto>,
    pub results: ListingPageDto,
}

// ===== Taxonomy =====

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaxonomyQuery {
    /// Restrict to one marketplace side
    pub mode: Option<SearchModeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubcategoryDto {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    #[schema(example = "fuel_auto")]
    pub code: String,
    pub label: String,
    pub mode: SearchModeDto,
    pub subcategories: Vec<SubcategoryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyResponse {
    pub categories: Vec<CategoryDto>,
}
