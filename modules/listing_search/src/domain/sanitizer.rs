//! Filter sanitization - the trust boundary in front of the search backend
//!
//! Every filter field is checked on its own. Invalid values are dropped, never
//! guessed, and sanitization never fails: the worst outcome is an empty
//! filter set with default paging.

use super::amount::parse_amount;
use super::taxonomy::Taxonomy;
use crate::contract::{
    ParsedQuery, SearchFilters, SearchMode, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use serde_json::{Map, Value};
use std::sync::Arc;

const MAX_LOCATION_LENGTH: usize = 100;

const QUERY_KEYS: &[&str] = &["query", "q", "search"];
const MODE_KEYS: &[&str] = &["mode"];
const CATEGORY_KEYS: &[&str] = &["category", "categoryCode", "category_code"];
const SUBCATEGORY_KEYS: &[&str] = &["subcategory", "subcategoryCode", "subcategory_code"];
const LOCATION_KEYS: &[&str] = &["location"];
const MIN_PRICE_KEYS: &[&str] = &["min_price", "minPrice"];
const MAX_PRICE_KEYS: &[&str] = &["max_price", "maxPrice"];
const MIN_REVENUE_KEYS: &[&str] = &["min_revenue", "minRevenue"];
const MIN_EBITDA_KEYS: &[&str] = &["min_ebitda", "minEbitda"];
const MIN_MRR_KEYS: &[&str] = &["min_mrr", "minMrr"];
const CHURN_KEYS: &[&str] = &["churn_rate", "churnRate", "max_churn_rate", "maxChurnRate"];
const VERIFIED_KEYS: &[&str] = &["verified_only", "verifiedOnly", "verified"];
const SORT_KEYS: &[&str] = &["sort", "sort_by", "sortBy"];
const PAGE_KEYS: &[&str] = &["page"];
const PAGE_SIZE_KEYS: &[&str] = &["page_size", "pageSize", "limit"];

/// Paging and length bounds applied by the sanitizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizerLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub max_page: u32,
    pub max_query_length: usize,
}

impl Default for SanitizerLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            max_page: 1000,
            max_query_length: 200,
        }
    }
}

/// Untrusted filter object as received from a client, a model or the parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFilters(Map<String, Value>);

impl RawFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Anything but an object is treated as empty.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Build from query-string style pairs; every value stays a string
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// First non-null value under any of the accepted key spellings
    fn lookup(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }
}

impl From<&ParsedQuery> for RawFilters {
    fn from(parsed: &ParsedQuery) -> Self {
        let mut raw = Self::new();
        if let Some(v) = &parsed.category_code {
            raw.insert("category", v.as_str());
        }
        if let Some(v) = &parsed.subcategory_code {
            raw.insert("subcategory", v.as_str());
        }
        if let Some(v) = &parsed.location {
            raw.insert("location", v.as_str());
        }
        if let Some(v) = parsed.min_ebitda {
            raw.insert("min_ebitda", v);
        }
        if let Some(v) = parsed.min_mrr {
            raw.insert("min_mrr", v);
        }
        if let Some(v) = parsed.min_revenue {
            raw.insert("min_revenue", v);
        }
        if let Some(v) = parsed.max_price {
            raw.insert("max_price", v);
        }
        if let Some(v) = parsed.churn_rate {
            raw.insert("churn_rate", v);
        }
        if let Some(v) = &parsed.query {
            raw.insert("query", v.as_str());
        }
        raw
    }
}

impl From<&SearchFilters> for RawFilters {
    fn from(filters: &SearchFilters) -> Self {
        let mut raw = Self::new();
        if let Some(v) = &filters.query {
            raw.insert("query", v.as_str());
        }
        if let Some(v) = filters.mode {
            raw.insert("mode", v.as_str());
        }
        if let Some(v) = &filters.category {
            raw.insert("category", v.as_str());
        }
        if let Some(v) = &filters.subcategory {
            raw.insert("subcategory", v.as_str());
        }
        if let Some(v) = &filters.location {
            raw.insert("location", v.as_str());
        }
        let amounts = [
            ("min_price", filters.min_price),
            ("max_price", filters.max_price),
            ("min_revenue", filters.min_revenue),
            ("min_ebitda", filters.min_ebitda),
            ("min_mrr", filters.min_mrr),
            ("churn_rate", filters.churn_rate),
        ];
        for (key, value) in amounts {
            if let Some(v) = value {
                raw.insert(key, v);
            }
        }
        if let Some(v) = filters.verified_only {
            raw.insert("verified_only", v);
        }
        if let Some(v) = filters.sort {
            raw.insert("sort", v.as_str());
        }
        raw.insert("page", filters.page);
        raw.insert("page_size", filters.page_size);
        raw
    }
}

/// Validates untrusted filters against the taxonomy and numeric bounds
#[derive(Debug, Clone)]
pub struct FilterSanitizer {
    taxonomy: Arc<Taxonomy>,
    limits: SanitizerLimits,
}

impl FilterSanitizer {
    pub fn new(taxonomy: Arc<Taxonomy>, limits: SanitizerLimits) -> Self {
        let max_page_size = limits.max_page_size.max(1);
        let limits = SanitizerLimits {
            max_page_size,
            default_page_size: limits.default_page_size.clamp(1, max_page_size),
            max_page: limits.max_page.max(1),
            max_query_length: limits.max_query_length.max(1),
        };
        Self { taxonomy, limits }
    }

    pub fn limits(&self) -> SanitizerLimits {
        self.limits
    }

    /// Produce a filter set where every present field is valid
    pub fn sanitize(&self, raw: &RawFilters) -> SearchFilters {
        let mode = raw
            .lookup(MODE_KEYS)
            .and_then(coerce_text)
            .and_then(|m| SearchMode::parse(&m));

        let category = raw
            .lookup(CATEGORY_KEYS)
            .and_then(coerce_text)
            .and_then(|c| self.taxonomy.resolve_category(&c))
            .filter(|c| mode.map_or(true, |m| m == c.mode));

        let subcategory = category.and_then(|c| {
            raw.lookup(SUBCATEGORY_KEYS)
                .and_then(coerce_text)
                .and_then(|s| c.resolve_subcategory(&s))
                .map(|s| s.code.clone())
        });

        let filters = SearchFilters {
            query: raw
                .lookup(QUERY_KEYS)
                .and_then(coerce_text)
                .map(|q| truncate_chars(&collapse_whitespace(&q), self.limits.max_query_length))
                .filter(|q| !q.is_empty()),
            mode,
            category: category.map(|c| c.code.clone()),
            subcategory,
            location: raw
                .lookup(LOCATION_KEYS)
                .and_then(coerce_text)
                .and_then(|l| self.clean_location(&l)),
            min_price: raw.lookup(MIN_PRICE_KEYS).and_then(coerce_amount),
            max_price: raw.lookup(MAX_PRICE_KEYS).and_then(coerce_amount),
            min_revenue: raw.lookup(MIN_REVENUE_KEYS).and_then(coerce_amount),
            min_ebitda: raw.lookup(MIN_EBITDA_KEYS).and_then(coerce_amount),
            min_mrr: raw.lookup(MIN_MRR_KEYS).and_then(coerce_amount),
            churn_rate: raw
                .lookup(CHURN_KEYS)
                .and_then(coerce_percent)
                .filter(|v| *v <= 100.0),
            verified_only: raw.lookup(VERIFIED_KEYS).and_then(coerce_bool),
            sort: raw
                .lookup(SORT_KEYS)
                .and_then(coerce_text)
                .and_then(|s| SortOrder::parse(&s)),
            page: clamp_count(raw.lookup(PAGE_KEYS), 1, self.limits.max_page),
            page_size: clamp_count(
                raw.lookup(PAGE_SIZE_KEYS),
                self.limits.default_page_size,
                self.limits.max_page_size,
            ),
        };

        tracing::debug!(
            category = ?filters.category,
            subcategory = ?filters.subcategory,
            structured = filters.has_structured_filters(),
            page = filters.page,
            page_size = filters.page_size,
            "sanitized search filters"
        );
        filters
    }

    /// Re-check category/subcategory membership right before a search.
    ///
    /// Drops the category when it is unknown or belongs to the other mode,
    /// and drops the subcategory whenever its parent is gone or mismatched.
    pub fn validate_taxonomy(&self, mut filters: SearchFilters) -> SearchFilters {
        let category = filters
            .category
            .as_deref()
            .and_then(|code| self.taxonomy.category(code))
            .filter(|c| filters.mode.map_or(true, |m| m == c.mode));

        match category {
            None => {
                if filters.category.is_some() || filters.subcategory.is_some() {
                    tracing::warn!(
                        category = ?filters.category,
                        subcategory = ?filters.subcategory,
                        "dropping category filters that failed taxonomy re-check"
                    );
                }
                filters.category = None;
                filters.subcategory = None;
            }
            Some(category) => {
                let valid_sub = filters
                    .subcategory
                    .as_deref()
                    .is_some_and(|s| category.subcategory(s).is_some());
                if !valid_sub {
                    filters.subcategory = None;
                }
            }
        }
        filters
    }

    /// Override paging on an already sanitized set, with the same clamping
    pub fn apply_paging(&self, filters: &mut SearchFilters, page: Option<u32>, page_size: Option<u32>) {
        if let Some(page) = page {
            filters.page = page.clamp(1, self.limits.max_page);
        }
        if let Some(size) = page_size {
            filters.page_size = size.clamp(1, self.limits.max_page_size);
        }
    }

    fn clean_location(&self, raw: &str) -> Option<String> {
        let cleaned = collapse_whitespace(raw);
        if !cleaned.chars().any(char::is_alphanumeric) {
            return None;
        }
        let location = match self.taxonomy.canonical_location(&cleaned) {
            Some(canonical) => canonical.to_string(),
            None => truncate_chars(&cleaned, MAX_LOCATION_LENGTH),
        };
        Some(location)
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

fn coerce_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }?;
    // `+ 0.0` turns -0.0 into 0.0
    (amount.is_finite() && amount >= 0.0).then_some(amount + 0.0)
}

/// Like [`coerce_amount`] but accepts a trailing `%` on strings ("4.5%")
fn coerce_percent(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            let stripped = trimmed.strip_suffix('%').unwrap_or(trimmed);
            coerce_amount(&Value::String(stripped.to_string()))
        }
        other => coerce_amount(other),
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a page-like count and clamp it to `1..=max`; unusable input falls
/// back to `default`
fn clamp_count(value: Option<&Value>, default: u32, max: u32) -> u32 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => {
            let n = n.trunc();
            if n < 1.0 {
                1
            } else if n > f64::from(max) {
                max
            } else {
                n as u32
            }
        }
        _ => default,
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(raw: &str, max: usize) -> String {
    match raw.char_indices().nth(max) {
        Some((idx, _)) => raw[..idx].trim_end().to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitizer() -> FilterSanitizer {
        FilterSanitizer::new(
            Arc::new(Taxonomy::builtin().unwrap()),
            SanitizerLimits::default(),
        )
    }

    fn sanitize(value: Value) -> SearchFilters {
        sanitizer().sanitize(&RawFilters::from_value(value))
    }

    #[test]
    fn test_unknown_category_negative_price_and_huge_page_size() {
        let filters = sanitize(json!({
            "category": "Nonexistent Category",
            "min_price": -5,
            "page_size": 9999
        }));
        assert_eq!(
            filters,
            SearchFilters {
                page: 1,
                page_size: 60,
                ..SearchFilters::default()
            }
        );
    }

    #[test]
    fn test_numbers_coerced_from_strings() {
        let filters = sanitize(json!({
            "min_price": "$250,000",
            "max_price": "1.5m",
            "min_revenue": 1000000,
            "minEbitda": " 300k ",
            "min_mrr": "abc"
        }));
        assert_eq!(filters.min_price, Some(250_000.0));
        assert_eq!(filters.max_price, Some(1_500_000.0));
        assert_eq!(filters.min_revenue, Some(1_000_000.0));
        assert_eq!(filters.min_ebitda, Some(300_000.0));
        assert_eq!(filters.min_mrr, None);
    }

    #[test]
    fn test_non_numeric_types_dropped() {
        let filters = sanitize(json!({
            "min_price": true,
            "max_price": [1, 2],
            "min_revenue": {"value": 3}
        }));
        assert_eq!(filters.min_price, None);
        assert_eq!(filters.max_price, None);
        assert_eq!(filters.min_revenue, None);
    }

    #[test]
    fn test_churn_above_hundred_dropped() {
        assert_eq!(sanitize(json!({"churnRate": 150})).churn_rate, None);
        assert_eq!(sanitize(json!({"churn_rate": "4.5"})).churn_rate, Some(4.5));
    }

    #[test]
    fn test_churn_percent_suffix_accepted() {
        assert_eq!(sanitize(json!({"churn_rate": "10%"})).churn_rate, Some(10.0));
        assert_eq!(sanitize(json!({"maxChurnRate": " 3.5 % "})).churn_rate, Some(3.5));
        assert_eq!(sanitize(json!({"churn_rate": "150%"})).churn_rate, None);
        assert_eq!(sanitize(json!({"min_price": "10%"})).min_price, None);
    }

    #[test]
    fn test_negative_zero_normalized() {
        let filters = sanitize(json!({"min_price": -0.0, "max_price": "-0"}));
        assert!(filters.min_price.is_some_and(|v| v == 0.0 && v.is_sign_positive()));
        assert!(filters.max_price.is_some_and(|v| v == 0.0 && v.is_sign_positive()));
    }

    #[test]
    fn test_category_label_normalized_to_code() {
        let filters = sanitize(json!({
            "category": "  SaaS & Software ",
            "subcategory": "B2B SaaS"
        }));
        assert_eq!(filters.category.as_deref(), Some("saas_software"));
        assert_eq!(filters.subcategory.as_deref(), Some("b2b_saas"));
    }

    #[test]
    fn test_subcategory_requires_parent() {
        let filters = sanitize(json!({"subcategory": "gas_stations"}));
        assert_eq!(filters.subcategory, None);

        let filters = sanitize(json!({"category": "saas_software", "subcategory": "gas_stations"}));
        assert_eq!(filters.category.as_deref(), Some("saas_software"));
        assert_eq!(filters.subcategory, None);
    }

    #[test]
    fn test_category_of_other_mode_dropped() {
        let filters = sanitize(json!({
            "mode": "digital",
            "category": "fuel_auto",
            "subcategory": "gas_stations"
        }));
        assert_eq!(filters.mode, Some(SearchMode::Digital));
        assert_eq!(filters.category, None);
        assert_eq!(filters.subcategory, None);
    }

    #[test]
    fn test_parser_keys_accepted() {
        let filters = sanitize(json!({
            "categoryCode": "fuel_auto",
            "subcategoryCode": "gas_stations",
            "location": "Ontario",
            "minEbitda": 500000
        }));
        assert_eq!(filters.category.as_deref(), Some("fuel_auto"));
        assert_eq!(filters.subcategory.as_deref(), Some("gas_stations"));
        assert_eq!(filters.location.as_deref(), Some("Ontario"));
        assert_eq!(filters.min_ebitda, Some(500_000.0));
    }

    #[test]
    fn test_paging_clamped_and_defaulted() {
        let filters = sanitize(json!({"page": 0, "page_size": "12"}));
        assert_eq!(filters.page, 1);
        assert_eq!(filters.page_size, 12);

        let filters = sanitize(json!({"page": "2.7", "pageSize": -4}));
        assert_eq!(filters.page, 2);
        assert_eq!(filters.page_size, 1);

        let filters = sanitize(json!({"page": "many", "page_size": null}));
        assert_eq!(filters.page, 1);
        assert_eq!(filters.page_size, DEFAULT_PAGE_SIZE);

        let filters = sanitize(json!({"page": 1e12}));
        assert_eq!(filters.page, 1000);
    }

    #[test]
    fn test_text_fields_trimmed_and_bounded() {
        let long = "word ".repeat(100);
        let filters = sanitize(json!({
            "query": format!("  {}  ", long),
            "location": "  greater   toronto area ",
            "sort": "PRICE-DESC",
            "verified": "yes"
        }));
        let query = filters.query.unwrap();
        assert!(query.chars().count() <= 200);
        assert!(!query.ends_with(' '));
        assert_eq!(filters.location.as_deref(), Some("Ontario"));
        assert_eq!(filters.sort, Some(SortOrder::PriceDesc));
        assert_eq!(filters.verified_only, Some(true));
    }

    #[test]
    fn test_blank_and_symbol_only_strings_dropped() {
        let filters = sanitize(json!({"query": "   ", "location": " -- ", "mode": "both"}));
        assert_eq!(filters.query, None);
        assert_eq!(filters.location, None);
        assert_eq!(filters.mode, None);
    }

    #[test]
    fn test_non_object_input_yields_defaults() {
        assert_eq!(sanitize(json!("category=fuel_auto")), SearchFilters::default());
        assert_eq!(sanitize(json!(null)), SearchFilters::default());
    }

    #[test]
    fn test_query_string_pairs() {
        let raw = RawFilters::from_pairs([
            ("category", "fuel_auto"),
            ("max_price", "2,000,000"),
            ("page", "3"),
        ]);
        let filters = sanitizer().sanitize(&raw);
        assert_eq!(filters.category.as_deref(), Some("fuel_auto"));
        assert_eq!(filters.max_price, Some(2_000_000.0));
        assert_eq!(filters.page, 3);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let sanitizer = sanitizer();
        let inputs = [
            json!({"category": "Retail", "subcategory": "Grocery", "location": "GTA",
                   "min_price": "$100k", "sort": "newest", "page": "4", "verified_only": 1}),
            json!({"query": "  quiet   bakery ", "mode": "operational", "churn_rate": 3}),
            json!({"category": "fuel_auto", "mode": "digital", "page_size": 500}),
            json!({}),
        ];
        for input in inputs {
            let once = sanitizer.sanitize(&RawFilters::from_value(input));
            let twice = sanitizer.sanitize(&RawFilters::from(&once));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_validate_taxonomy_drops_mismatched_subcategory() {
        let sanitizer = sanitizer();
        let filters = SearchFilters {
            category: Some("fuel_auto".to_string()),
            subcategory: Some("b2b_saas".to_string()),
            ..SearchFilters::default()
        };
        let validated = sanitizer.validate_taxonomy(filters);
        assert_eq!(validated.category.as_deref(), Some("fuel_auto"));
        assert_eq!(validated.subcategory, None);
    }

    #[test]
    fn test_validate_taxonomy_drops_orphan_subcategory() {
        let sanitizer = sanitizer();
        let filters = SearchFilters {
            category: Some("made_up".to_string()),
            subcategory: Some("gas_stations".to_string()),
            ..SearchFilters::default()
        };
        let validated = sanitizer.validate_taxonomy(filters);
        assert_eq!(validated.category, None);
        assert_eq!(validated.subcategory, None);
    }

    #[test]
    fn test_validate_taxonomy_keeps_valid_pair() {
        let sanitizer = sanitizer();
        let filters = SearchFilters {
            mode: Some(SearchMode::Operational),
            category: Some("fuel_auto".to_string()),
            subcategory: Some("gas_stations".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(sanitizer.validate_taxonomy(filters.clone()), filters);
    }

    #[test]
    fn test_apply_paging_clamps() {
        let sanitizer = sanitizer();
        let mut filters = SearchFilters::default();
        sanitizer.apply_paging(&mut filters, Some(0), Some(500));
        assert_eq!(filters.page, 1);
        assert_eq!(filters.page_size, 60);
    }

    #[test]
    fn test_limits_are_normalized() {
        let sanitizer = FilterSanitizer::new(
            Arc::new(Taxonomy::builtin().unwrap()),
            SanitizerLimits {
                default_page_size: 100,
                max_page_size: 50,
                max_page: 0,
                max_query_length: 0,
            },
        );
        let limits = sanitizer.limits();
        assert_eq!(limits.default_page_size, 50);
        assert_eq!(limits.max_page, 1);
        assert_eq!(limits.max_query_length, 1);
    }
}
