//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::{map_domain_error, Problem};
use crate::contract::SearchMode;
use crate::domain::sanitizer::RawFilters;
use crate::domain::Service;
use axum::{extract::Query, Json};
use std::collections::HashMap;
use std::sync::Arc;

/// Extract filters from free text without searching
#[utoipa::path(
    post,
    path = "/search/parse",
    tag = "search",
    request_body = ParseQueryRequest,
    responses((status = 200, body = ParsedQueryDto))
)]
pub async fn parse_query(
    service: Arc<Service>,
    Json(req): Json<ParseQueryRequest>,
) -> Result<Json<ParsedQueryDto>, Problem> {
    let parsed = service.parse_query(&req.query, req.mode.into());
    Ok(Json(parsed.into()))
}

/// Validate an untrusted filter object against the taxonomy and bounds
#[utoipa::path(
    post,
    path = "/search/filters/sanitize",
    tag = "search",
    request_body = serde_json::Value,
    responses((status = 200, body = SearchFiltersDto))
)]
pub async fn sanitize_filters(
    service: Arc<Service>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<SearchFiltersDto>, Problem> {
    let filters = service.sanitize_filters(&RawFilters::from_value(raw));
    Ok(Json(filters.into()))
}

/// Search with filters given as query parameters
#[utoipa::path(
    get,
    path = "/search/listings",
    tag = "search",
    responses(
        (status = 200, body = SearchResponse),
        (status = 502, body = Problem),
    )
)]
pub async fn search_listings_query(
    service: Arc<Service>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SearchResponse>, Problem> {
    let outcome = service
        .search(&RawFilters::from_pairs(params))
        .await
        .map_err(map_domain_error)?;
    Ok(Json(outcome.into()))
}

/// Search with filters given as a JSON body
#[utoipa::path(
    post,
    path = "/search/listings",
    tag = "search",
    request_body = serde_json::Value,
    responses(
        (status = 200, body = SearchResponse),
        (status = 502, body = Problem),
    )
)]
pub async fn search_listings_body(
    service: Arc<Service>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<SearchResponse>, Problem> {
    let outcome = service
        .search(&RawFilters::from_value(raw))
        .await
        .map_err(map_domain_error)?;
    Ok(Json(outcome.into()))
}

/// Search from free text
#[utoipa::path(
    post,
    path = "/search/smart",
    tag = "search",
    request_body = SmartSearchRequest,
    responses(
        (status = 200, body = SmartSearchResponse),
        (status = 400, body = Problem),
        (status = 422, description = "No filter could be inferred from the query", body = Problem),
        (status = 502, body = Problem),
    )
)]
pub async fn smart_search(
    service: Arc<Service>,
    Json(req): Json<SmartSearchRequest>,
) -> Result<Json<SmartSearchResponse>, Problem> {
    let outcome = service
        .smart_search(&req.query, req.mode.into(), req.page, req.page_size)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(outcome.into()))
}

/// Categories and subcategories accepted by the filters
#[utoipa::path(
    get,
    path = "/search/taxonomy",
    tag = "search",
    params(TaxonomyQuery),
    responses((status = 200, body = TaxonomyResponse))
)]
pub async fn taxonomy(
    service: Arc<Service>,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Json<TaxonomyResponse>, Problem> {
    let mode: Option<SearchMode> = query.mode.map(Into::into);
    let categories = service
        .taxonomy()
        .categories
        .iter()
        .filter(|c| mode.map_or(true, |m| m == c.mode))
        .map(Into::into)
        .collect();
    Ok(Json(TaxonomyResponse { categories }))
}
