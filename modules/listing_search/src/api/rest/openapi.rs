//! OpenAPI document for the search routes

use super::dto::*;
use super::error::Problem;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NxtOwner Listing Search API",
        version = "0.1.0",
        description = "Natural-language filter extraction and filtered listing search"
    ),
    paths(
        super::handlers::parse_query,
        super::handlers::sanitize_filters,
        super::handlers::search_listings_query,
        super::handlers::search_listings_body,
        super::handlers::smart_search,
        super::handlers::taxonomy,
    ),
    components(schemas(
        Problem,
        SearchModeDto,
        ParseQueryRequest,
        ParsedQueryDto,
        SearchFiltersDto,
        ListingDto,
        ListingPageDto,
        SearchResponse,
        SmartSearchRequest,
        SmartSearchResponse,
        SubcategoryDto,
        CategoryDto,
        TaxonomyResponse,
    )),
    tags((name = "search", description = "Listing search and filter extraction"))
)]
pub struct ApiDoc;
