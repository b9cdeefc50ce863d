//! Route registration

use super::{dto::*, error::Problem, handlers, openapi::ApiDoc};
use crate::domain::Service;
use axum::{
    extract::Query,
    routing::{get, post},
    Extension, Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::OpenApi;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        .route("/search/parse", post(parse_query_handler))
        .route("/search/filters/sanitize", post(sanitize_filters_handler))
        .route(
            "/search/listings",
            get(search_listings_query_handler).post(search_listings_body_handler),
        )
        .route("/search/smart", post(smart_search_handler))
        .route("/search/taxonomy", get(taxonomy_handler))
        .route("/openapi.json", get(openapi_handler))
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(router)
}

// ===== Handler wrappers that extract service from Extension =====

async fn parse_query_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<ParseQueryRequest>,
) -> Result<Json<ParsedQueryDto>, Problem> {
    handlers::parse_query(service, json).await
}

async fn sanitize_filters_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<serde_json::Value>,
) -> Result<Json<SearchFiltersDto>, Problem> {
    handlers::sanitize_filters(service, json).await
}

async fn search_listings_query_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<HashMap<String, String>>,
) -> Result<Json<SearchResponse>, Problem> {
    handlers::search_listings_query(service, query).await
}

async fn search_listings_body_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<serde_json::Value>,
) -> Result<Json<SearchResponse>, Problem> {
    handlers::search_listings_body(service, json).await
}

async fn smart_search_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<SmartSearchRequest>,
) -> Result<Json<SmartSearchResponse>, Problem> {
    handlers::smart_search(service, json).await
}

async fn taxonomy_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<TaxonomyQuery>,
) -> Result<Json<TaxonomyResponse>, Problem> {
    handlers::taxonomy(service, query).await
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
