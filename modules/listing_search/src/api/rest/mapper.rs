//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract::{self, SearchMode};
use crate::domain::taxonomy::{Category, Subcategory};

impl From<SearchMode> for SearchModeDto {
    fn from(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Operational => Self::Operational,
            SearchMode::Digital => Self::Digital,
        }
    }
}

impl From<SearchModeDto> for SearchMode {
    fn from(mode: SearchModeDto) -> Self {
        match mode {
            SearchModeDto::Operational => Self::Operational,
            SearchModeDto::Digital => Self::Digital,
        }
    }
}

impl From<contract::ParsedQuery> for ParsedQueryDto {
    fn from(parsed: contract::ParsedQuery) -> Self {
        Self {
            category_code: parsed.category_code,
            subcategory_code: parsed.subcategory_code,
            location: parsed.location,
            min_ebitda: parsed.min_ebitda,
            min_mrr: parsed.min_mrr,
            min_revenue: parsed.min_revenue,
            max_price: parsed.max_price,
            churn_rate: parsed.churn_rate,
            suggested_mode: parsed.suggested_mode.map(Into::into),
            query: parsed.query,
        }
    }
}

impl From<contract::SearchFilters> for SearchFiltersDto {
    fn from(filters: contract::SearchFilters) -> Self {
        Self {
            query: filters.query,
            mode: filters.mode.map(Into::into),
            category: filters.category,
            subcategory: filters.subcategory,
            location: filters.location,
            min_price: filters.min_price,
            max_price: filters.max_price,
            min_revenue: filters.min_revenue,
            min_ebitda: filters.min_ebitda,
            min_mrr: filters.min_mrr,
            churn_rate: filters.churn_rate,
            verified_only: filters.verified_only,
            sort: filters.sort.map(|s| s.as_str().to_string()),
            page: filters.page,
            page_size: filters.page_size,
        }
    }
}

impl From<contract::ListingSummary> for ListingDto {
    fn from(listing: contract::ListingSummary) -> Self {
        Self {
            id: listing.id,
            title: listing.title,
            teaser: listing.teaser,
            mode: listing.mode.into(),
            category_code: listing.category_code,
            subcategory_code: listing.subcategory_code,
            location: listing.location,
            asking_price: listing.asking_price,
            revenue: listing.revenue,
            ebitda: listing.ebitda,
            mrr: listing.mrr,
            churn_rate: listing.churn_rate,
            verified: listing.verified,
            created_at: listing.created_at,
        }
    }
}

impl From<contract::ListingPage> for ListingPageDto {
    fn from(page: contract::ListingPage) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

impl From<contract::SearchOutcome> for SearchResponse {
    fn from(outcome: contract::SearchOutcome) -> Self {
        Self {
            filters: outcome.filters.into(),
            results: outcome.results.into(),
        }
    }
}

impl From<contract::SmartSearchOutcome> for SmartSearchResponse {
    fn from(outcome: contract::SmartSearchOutcome) -> Self {
        Self {
            filters: outcome.resolved.filters.into(),
            source: outcome.resolved.source.as_str().to_string(),
            suggested_mode: outcome.resolved.suggested_mode.map(Into::into),
            results: outcome.results.into(),
        }
    }
}

impl From<&Subcategory> for SubcategoryDto {
    fn from(sub: &Subcategory) -> Self {
        Self {
            code: sub.code.clone(),
            label: sub.label.clone(),
        }
    }
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            code: category.code.clone(),
            label: category.label.clone(),
            mode: category.mode.into(),
            subcategories: category.subcategories.iter().map(Into::into).collect(),
        }
    }
}
