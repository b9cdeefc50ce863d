//! In-memory listing search backend
//!
//! Mirrors the filter semantics of the hosted listings query so the service
//! can run locally and in tests without the database.

use super::entity::ListingRecord;
use crate::contract::{ListingPage, ListingSummary, SearchFilters, SortOrder};
use crate::domain::repository::ListingSearchRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct InMemoryListingRepository {
    listings: Arc<RwLock<Vec<ListingSummary>>>,
}

impl InMemoryListingRepository {
    pub fn new(listings: Vec<ListingSummary>) -> Self {
        Self {
            listings: Arc::new(RwLock::new(listings)),
        }
    }

    /// Load listings from a JSON array of listing records
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read listings file {}", path.display()))?;
        let records: Vec<ListingRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse listings file {}", path.display()))?;
        let listings = records
            .into_iter()
            .map(ListingSummary::try_from)
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(count = listings.len(), path = %path.display(), "loaded listings fixture");
        Ok(Self::new(listings))
    }

    pub fn insert(&self, listing: ListingSummary) {
        self.listings.write().push(listing);
    }

    pub fn len(&self) -> usize {
        self.listings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.read().is_empty()
    }
}

#[async_trait]
impl ListingSearchRepository for InMemoryListingRepository {
    async fn search(&self, filters: &SearchFilters) -> Result<ListingPage> {
        let terms: Vec<String> = filters
            .query
            .as_deref()
            .map(|q| q.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default();

        let mut matches: Vec<ListingSummary> = self
            .listings
            .read()
            .iter()
            .filter(|l| matches_filters(l, filters) && matches_terms(l, &terms))
            .cloned()
            .collect();

        sort_listings(&mut matches, filters.sort.unwrap_or(SortOrder::Newest));

        let total = matches.len();
        let items = matches
            .into_iter()
            .skip(filters.offset())
            .take(filters.page_size as usize)
            .collect();

        Ok(ListingPage {
            items,
            total,
            page: filters.page,
            page_size: filters.page_size,
        })
    }
}

fn matches_filters(listing: &ListingSummary, filters: &SearchFilters) -> bool {
    if filters.mode.is_some_and(|m| m != listing.mode) {
        return false;
    }
    if filters
        .category
        .as_deref()
        .is_some_and(|c| c != listing.category_code)
    {
        return false;
    }
    if filters.subcategory.is_some() && filters.subcategory != listing.subcategory_code {
        return false;
    }
    if let Some(location) = &filters.location {
        let wanted = location.to_lowercase();
        let found = listing
            .location
            .as_deref()
            .is_some_and(|l| l.to_lowercase().contains(&wanted));
        if !found {
            return false;
        }
    }
    if filters.verified_only == Some(true) && !listing.verified {
        return false;
    }

    at_least(listing.asking_price, filters.min_price)
        && at_most(listing.asking_price, filters.max_price)
        && at_least(listing.revenue, filters.min_revenue)
        && at_least(listing.ebitda, filters.min_ebitda)
        && at_least(listing.mrr, filters.min_mrr)
        && at_most(listing.churn_rate, filters.churn_rate)
}

/// A bound on a missing value excludes the listing
fn at_least(value: Option<f64>, bound: Option<f64>) -> bool {
    match bound {
        None => true,
        Some(bound) => value.is_some_and(|v| v >= bound),
    }
}

fn at_most(value: Option<f64>, bound: Option<f64>) -> bool {
    match bound {
        None => true,
        Some(bound) => value.is_some_and(|v| v <= bound),
    }
}

fn matches_terms(listing: &ListingSummary, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let haystack = format!(
        "{} {} {} {}",
        listing.title,
        listing.teaser.as_deref().unwrap_or_default(),
        listing.location.as_deref().unwrap_or_default(),
        listing.category_code.replace('_', " "),
    )
    .to_lowercase();
    terms.iter().all(|t| haystack.contains(t.as_str()))
}

fn sort_listings(listings: &mut [ListingSummary], order: SortOrder) {
    match order {
        SortOrder::Newest => listings.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::PriceAsc => listings.sort_by(|a, b| missing_last(a.asking_price, b.asking_price, false)),
        SortOrder::PriceDesc => listings.sort_by(|a, b| missing_last(a.asking_price, b.asking_price, true)),
        SortOrder::RevenueDesc => listings.sort_by(|a, b| missing_last(a.revenue, b.revenue, true)),
        SortOrder::EbitdaDesc => listings.sort_by(|a, b| missing_last(a.ebitda, b.ebitda, true)),
        SortOrder::MrrDesc => listings.sort_by(|a, b| missing_last(a.mrr, b.mrr, true)),
    }
}

fn missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
