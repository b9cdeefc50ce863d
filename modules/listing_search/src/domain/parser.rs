//! Natural-language query parser
//!
//! Turns free text such as "gas station in Ontario over $500k EBITDA" into
//! structured filters using ordered keyword lists from the taxonomy and
//! context-classified amount patterns. Parsing is pure: the compiled
//! matchers are immutable and nothing is looked up outside the taxonomy.

use super::amount::{parse_digits, unit_multiplier};
use super::taxonomy::Taxonomy;
use crate::contract::{ParsedQuery, SearchMode};
use anyhow::{Context, Result};
use regex::Regex;

const AMOUNT_PATTERN: &str = r"(?i)(?P<cur>[$€£])?\s*(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)(?:\s*(?P<unit>thousand|million|billion|mil|mm|bn|k|m|b)\b)?(?P<pct>\s*(?:%|percent\b))?";

const COMPARATOR_PATTERN: &str = r"(?i)(?:^|[^\w])(?P<cmp>less than|lower than|fewer than|no more than|up to|at most|under|below|maximum|max|budget of|budget|within|more than|greater than|higher than|at least|over|above|minimum|min|from|<=|>=|<|>)\s*(?:of\s+)?$";

const METRIC_WORDS: &str = r"ebitda|sde|cash\s*flow|net\s+profit|profit|earnings|mrr|monthly\s+recurring\s+revenue|recurring\s+revenue|revenue|sales|arr|turnover";

const CHURN_AFTER_PATTERN: &str =
    r"(?i)^\s*(?:(?:monthly|annual|annualized|yearly)\s+)?(?:(?:customer|revenue|logo)\s+)?churn\b";

const CHURN_BEFORE_PATTERN: &str = r"(?i)\bchurn(?:\s+rate)?\s*(?:(?:of|is|at)\s*)?[:=]?\s*$";

/// Direction implied by the words in front of an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparator {
    AtLeast,
    AtMost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Ebitda,
    Mrr,
    Revenue,
}

/// Case-insensitive, word-bounded alternation over a keyword list
#[derive(Debug, Clone)]
struct KeywordMatcher {
    regex: Option<Regex>,
}

impl KeywordMatcher {
    fn new<'a>(keywords: impl IntoIterator<Item = &'a String>) -> Result<Self> {
        let mut alternatives: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(|k| {
                k.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { regex: None });
        }
        // Longest first so "b2b saas" wins over "saas" inside one alternation
        alternatives.sort_by_key(|a| std::cmp::Reverse(a.len()));
        let pattern = format!(
            r"(?i)(?:^|[^\p{{L}}\p{{N}}])(?:{})(?:e?s)?(?:$|[^\p{{L}}\p{{N}}])",
            alternatives.join("|")
        );
        let regex = Regex::new(&pattern)
            .with_context(|| format!("failed to compile keyword pattern: {}", pattern))?;
        Ok(Self { regex: Some(regex) })
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }
}

#[derive(Debug, Clone)]
struct SubcategoryMatcher {
    code: String,
    keywords: KeywordMatcher,
}

#[derive(Debug, Clone)]
struct CategoryMatcher {
    code: String,
    mode: SearchMode,
    keywords: KeywordMatcher,
    subcategories: Vec<SubcategoryMatcher>,
}

#[derive(Debug, Clone)]
struct LocationMatcher {
    name: String,
    keywords: KeywordMatcher,
}

/// Compiled query parser for one taxonomy
#[derive(Debug, Clone)]
pub struct QueryParser {
    categories: Vec<CategoryMatcher>,
    locations: Vec<LocationMatcher>,
    operational_vocabulary: KeywordMatcher,
    digital_vocabulary: KeywordMatcher,
    amount: Regex,
    comparator: Regex,
    metric_after: Regex,
    metric_before: Regex,
    churn_after: Regex,
    churn_before: Regex,
}

impl QueryParser {
    /// Compile matchers for every category, subcategory and location
    pub fn new(taxonomy: &Taxonomy) -> Result<Self> {
        let mut categories = Vec::with_capacity(taxonomy.categories.len());
        for category in &taxonomy.categories {
            let mut subcategories = Vec::with_capacity(category.subcategories.len());
            for sub in &category.subcategories {
                subcategories.push(SubcategoryMatcher {
                    code: sub.code.clone(),
                    keywords: KeywordMatcher::new(&sub.keywords)?,
                });
            }
            categories.push(CategoryMatcher {
                code: category.code.clone(),
                mode: category.mode,
                keywords: KeywordMatcher::new(&category.keywords)?,
                subcategories,
            });
        }

        let mut locations = Vec::with_capacity(taxonomy.locations.len());
        for entry in &taxonomy.locations {
            let names = std::iter::once(&entry.name).chain(entry.aliases.iter());
            locations.push(LocationMatcher {
                name: entry.name.clone(),
                keywords: KeywordMatcher::new(names)?,
            });
        }

        let vocabulary = |mode: SearchMode| -> Result<KeywordMatcher> {
            let words = taxonomy
                .categories_for(mode)
                .flat_map(|c| {
                    c.keywords
                        .iter()
                        .chain(c.subcategories.iter().flat_map(|s| s.keywords.iter()))
                })
                .chain(taxonomy.signals.for_mode(mode).iter());
            KeywordMatcher::new(words)
        };

        Ok(Self {
            categories,
            locations,
            operational_vocabulary: vocabulary(SearchMode::Operational)?,
            digital_vocabulary: vocabulary(SearchMode::Digital)?,
            amount: Regex::new(AMOUNT_PATTERN).context("invalid amount pattern")?,
            comparator: Regex::new(COMPARATOR_PATTERN).context("invalid comparator pattern")?,
            metric_after: Regex::new(&format!(
                r"(?i)^\s*\+?\s*(?:/\s*(?:mo|month|yr|year)\b\s*)?(?:(?:in|of)\s+)?(?:(?P<period>annual|yearly|monthly)\s+)?(?P<metric>{})\b",
                METRIC_WORDS
            ))
            .context("invalid metric pattern")?,
            metric_before: Regex::new(&format!(
                r"(?i)(?:^|[^\w])(?:(?P<period>annual|yearly|monthly)\s+)?(?P<metric>{})\s*(?:(?:of|is|at)\s*)?[:=]?\s*$",
                METRIC_WORDS
            ))
            .context("invalid metric pattern")?,
            churn_after: Regex::new(CHURN_AFTER_PATTERN).context("invalid churn pattern")?,
            churn_before: Regex::new(CHURN_BEFORE_PATTERN).context("invalid churn pattern")?,
        })
    }

    /// Extract structured filters from `text` for the selected `mode`
    pub fn parse(&self, text: &str, mode: SearchMode) -> ParsedQuery {
        let text = text.trim();
        let mut parsed = ParsedQuery::default();
        if text.is_empty() {
            return parsed;
        }

        if let Some((category, subcategory)) = self.match_category(text, mode) {
            parsed.category_code = Some(category);
            parsed.subcategory_code = subcategory;
        }
        parsed.location = self
            .locations
            .iter()
            .find(|l| l.keywords.is_match(text))
            .map(|l| l.name.clone());

        self.extract_amounts(text, &mut parsed);
        parsed.suggested_mode = self.suggest_mode(text, mode);

        if !parsed.has_structured_fields() {
            parsed.query = Some(text.to_string());
        }

        tracing::debug!(
            mode = %mode,
            category = ?parsed.category_code,
            subcategory = ?parsed.subcategory_code,
            location = ?parsed.location,
            suggested_mode = ?parsed.suggested_mode,
            "parsed search query"
        );
        parsed
    }

    fn match_category(&self, text: &str, mode: SearchMode) -> Option<(String, Option<String>)> {
        for category in self.categories.iter().filter(|c| c.mode == mode) {
            if let Some(sub) = category.subcategories.iter().find(|s| s.keywords.is_match(text)) {
                return Some((category.code.clone(), Some(sub.code.clone())));
            }
            if category.keywords.is_match(text) {
                return Some((category.code.clone(), None));
            }
        }
        None
    }

    fn suggest_mode(&self, text: &str, mode: SearchMode) -> Option<SearchMode> {
        let (selected, other) = match mode {
            SearchMode::Operational => (&self.operational_vocabulary, &self.digital_vocabulary),
            SearchMode::Digital => (&self.digital_vocabulary, &self.operational_vocabulary),
        };
        if other.is_match(text) && !selected.is_match(text) {
            Some(mode.other())
        } else {
            None
        }
    }

    fn extract_amounts(&self, text: &str, parsed: &mut ParsedQuery) {
        for caps in self.amount.captures_iter(text) {
            let (Some(whole), Some(num)) = (caps.get(0), caps.name("num")) else {
                continue;
            };
            // Digits glued to letters ("b2b", "24x7") are not amounts
            if text[..num.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric())
            {
                continue;
            }
            // Only part of a malformed number matched ("1.5.3", "1,50")
            if continues_number(&text[..num.start()], &text[num.end()..]) {
                continue;
            }
            let Some(base) = parse_digits(num.as_str()) else {
                continue;
            };

            let has_currency = caps.name("cur").is_some();
            let unit = caps.name("unit").map(|m| m.as_str());
            let is_percent = caps.name("pct").is_some();
            let value = match unit {
                Some(u) => match unit_multiplier(u) {
                    Some(multiplier) => base * multiplier,
                    None => continue,
                },
                None => base,
            };

            let before = &text[..whole.start()];
            let after = &text[whole.end()..];
            let (comparator, lead) = self.comparator_before(before);

            if is_percent {
                if unit.is_none()
                    && parsed.churn_rate.is_none()
                    && comparator != Some(Comparator::AtLeast)
                    && (self.churn_after.is_match(after) || self.churn_before.is_match(lead))
                {
                    parsed.churn_rate = Some(value);
                }
                continue;
            }

            let bare = !has_currency && unit.is_none();
            if bare && num.as_str().len() == 4 && (1900.0..=2100.0).contains(&value) {
                // Looks like a year ("established 2015")
                continue;
            }

            let metric = self
                .metric_from(&self.metric_after, after)
                .or_else(|| self.metric_from(&self.metric_before, lead));

            match metric {
                Some(_) if comparator == Some(Comparator::AtMost) => {}
                Some(Metric::Ebitda) => {
                    parsed.min_ebitda.get_or_insert(value);
                }
                Some(Metric::Mrr) => {
                    parsed.min_mrr.get_or_insert(value);
                }
                Some(Metric::Revenue) => {
                    parsed.min_revenue.get_or_insert(value);
                }
                None if comparator == Some(Comparator::AtMost) && !bare => {
                    parsed.max_price.get_or_insert(value);
                }
                None => {}
            }
        }
    }

    /// Split the text before an amount into its trailing comparator and the
    /// remainder in front of it
    fn comparator_before<'t>(&self, before: &'t str) -> (Option<Comparator>, &'t str) {
        let Some(cmp) = self.comparator.captures(before).and_then(|c| c.name("cmp")) else {
            return (None, before);
        };
        let comparator = match cmp.as_str().to_lowercase().as_str() {
            "more than" | "greater than" | "higher than" | "at least" | "over" | "above"
            | "minimum" | "min" | "from" | ">=" | ">" => Comparator::AtLeast,
            _ => Comparator::AtMost,
        };
        (Some(comparator), &before[..cmp.start()])
    }

    fn metric_from(&self, pattern: &Regex, context: &str) -> Option<Metric> {
        let caps = pattern.captures(context)?;
        let metric = caps.name("metric")?.as_str().to_lowercase();
        let monthly = caps
            .name("period")
            .is_some_and(|p| p.as_str().eq_ignore_ascii_case("monthly"));
        let metric = metric.split_whitespace().collect::<Vec<_>>().join(" ");

        Some(match metric.as_str() {
            "mrr" | "monthly recurring revenue" | "recurring revenue" => Metric::Mrr,
            "revenue" | "sales" if monthly => Metric::Mrr,
            "revenue" | "sales" | "arr" | "turnover" => Metric::Revenue,
            _ => Metric::Ebitda,
        })
    }
}

fn continues_number(before: &str, after: &str) -> bool {
    let glued = |mut chars: std::str::Chars<'_>, reverse: bool| {
        let next = if reverse { chars.next_back() } else { chars.next() };
        match next {
            Some(c) if c.is_ascii_digit() => true,
            Some('.' | ',') => {
                let digit = if reverse { chars.next_back() } else { chars.next() };
                digit.is_some_and(|c| c.is_ascii_digit())
            }
            _ => false,
        }
    };
    glued(before.chars(), true) || glued(after.chars(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> QueryParser {
        QueryParser::new(&Taxonomy::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_gas_station_query() {
        let parsed = parser().parse(
            "gas station in Ontario over $500k EBITDA",
            SearchMode::Operational,
        );
        assert_eq!(
            parsed,
            ParsedQuery {
                category_code: Some("fuel_auto".to_string()),
                subcategory_code: Some("gas_stations".to_string()),
                location: Some("Ontario".to_string()),
                min_ebitda: Some(500_000.0),
                ..ParsedQuery::default()
            }
        );
    }

    #[test]
    fn test_saas_query_with_mrr_and_churn() {
        let parsed = parser().parse("SaaS with $20k MRR and under 10% churn", SearchMode::Digital);
        assert_eq!(
            parsed,
            ParsedQuery {
                category_code: Some("saas_software".to_string()),
                subcategory_code: Some("b2b_saas".to_string()),
                min_mrr: Some(20_000.0),
                churn_rate: Some(10.0),
                ..ParsedQuery::default()
            }
        );
    }

    #[test]
    fn test_mode_mismatch_suggests_digital() {
        let parsed = parser().parse("SaaS business for sale", SearchMode::Operational);
        assert_eq!(
            parsed,
            ParsedQuery {
                suggested_mode: Some(SearchMode::Digital),
                query: Some("SaaS business for sale".to_string()),
                ..ParsedQuery::default()
            }
        );
    }

    #[test]
    fn test_mode_mismatch_suggests_operational() {
        let parsed = parser().parse("restaurant near the lake", SearchMode::Digital);
        assert_eq!(parsed.suggested_mode, Some(SearchMode::Operational));
        assert!(parsed.category_code.is_none());
    }

    #[test]
    fn test_conflicting_vocabulary_suppresses_suggestion() {
        let parsed = parser().parse("restaurant with a SaaS ordering app", SearchMode::Operational);
        assert_eq!(parsed.suggested_mode, None);
        assert_eq!(parsed.category_code.as_deref(), Some("food_beverage"));
        assert_eq!(parsed.subcategory_code.as_deref(), Some("restaurants"));
    }

    #[test]
    fn test_location_alias_normalized() {
        let parsed = parser().parse("car wash in the GTA", SearchMode::Operational);
        assert_eq!(parsed.location.as_deref(), Some("Ontario"));
        assert_eq!(parsed.subcategory_code.as_deref(), Some("car_washes"));
    }

    #[test]
    fn test_plural_keywords_match() {
        let parsed = parser().parse("gas stations for sale", SearchMode::Operational);
        assert_eq!(parsed.subcategory_code.as_deref(), Some("gas_stations"));
    }

    #[test]
    fn test_category_keyword_without_subcategory() {
        let parsed = parser().parse("manufacturing business in Alberta", SearchMode::Operational);
        assert_eq!(parsed.category_code.as_deref(), Some("manufacturing"));
        assert_eq!(parsed.subcategory_code, None);
        assert_eq!(parsed.location.as_deref(), Some("Alberta"));
    }

    #[test]
    fn test_max_price_with_units() {
        let parsed = parser().parse("restaurant under $1.5 million", SearchMode::Operational);
        assert_eq!(parsed.max_price, Some(1_500_000.0));
        let parsed = parser().parse("dental clinic up to 2m", SearchMode::Operational);
        assert_eq!(parsed.max_price, Some(2_000_000.0));
    }

    #[test]
    fn test_metric_before_amount() {
        let parsed = parser().parse("hotel with EBITDA over $750,000", SearchMode::Operational);
        assert_eq!(parsed.min_ebitda, Some(750_000.0));
        assert_eq!(parsed.max_price, None);
    }

    #[test]
    fn test_revenue_and_monthly_revenue() {
        let parsed = parser().parse("shopify store doing $2m in annual revenue", SearchMode::Digital);
        assert_eq!(parsed.min_revenue, Some(2_000_000.0));
        assert_eq!(parsed.min_mrr, None);

        let parsed = parser().parse("newsletter with 15k monthly revenue", SearchMode::Digital);
        assert_eq!(parsed.min_mrr, Some(15_000.0));
        assert_eq!(parsed.min_revenue, None);
    }

    #[test]
    fn test_metric_ceiling_is_ignored() {
        let parsed = parser().parse("blog under $5k MRR", SearchMode::Digital);
        assert_eq!(parsed.min_mrr, None);
        assert_eq!(parsed.max_price, None);
    }

    #[test]
    fn test_bare_numbers_fail_closed() {
        let parsed = parser().parse("trucking company with 12 trucks", SearchMode::Operational);
        assert_eq!(parsed.max_price, None);
        assert_eq!(parsed.min_revenue, None);
        assert_eq!(parsed.subcategory_code.as_deref(), Some("trucking"));

        let parsed = parser().parse("pizzeria under 400", SearchMode::Operational);
        assert_eq!(parsed.max_price, None);
    }

    #[test]
    fn test_digits_inside_words_are_not_amounts() {
        let parsed = parser().parse("b2b saas under $3m", SearchMode::Digital);
        assert_eq!(parsed.max_price, Some(3_000_000.0));
        assert_eq!(parsed.subcategory_code.as_deref(), Some("b2b_saas"));
    }

    #[test]
    fn test_malformed_numbers_fail_closed() {
        for query in ["restaurant under $1.5.3m", "restaurant under $1,50m"] {
            let parsed = parser().parse(query, SearchMode::Operational);
            assert_eq!(parsed.max_price, None, "{query}");
        }
        let parsed = parser().parse("restaurant under $1,500,000.", SearchMode::Operational);
        assert_eq!(parsed.max_price, Some(1_500_000.0));
    }

    #[test]
    fn test_year_is_not_revenue() {
        let parsed = parser().parse("bakery established 2015 revenue", SearchMode::Operational);
        assert_eq!(parsed.min_revenue, None);
    }

    #[test]
    fn test_churn_floor_is_ignored() {
        let parsed = parser().parse("saas with churn above 5%", SearchMode::Digital);
        assert_eq!(parsed.churn_rate, None);
        let parsed = parser().parse("saas with churn below 4 percent", SearchMode::Digital);
        assert_eq!(parsed.churn_rate, Some(4.0));
    }

    #[test]
    fn test_percent_without_churn_is_ignored() {
        let parsed = parser().parse("saas with 30% margins", SearchMode::Digital);
        assert_eq!(parsed.churn_rate, None);
    }

    #[test]
    fn test_unmatched_query_is_preserved() {
        let parsed = parser().parse("  something unusual  ", SearchMode::Operational);
        assert_eq!(parsed.query.as_deref(), Some("something unusual"));
        assert!(!parsed.has_structured_fields());
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let parsed = parser().parse("   ", SearchMode::Digital);
        assert_eq!(parsed, ParsedQuery::default());
    }

    #[test]
    fn test_categories_of_other_mode_are_not_extracted() {
        let parsed = parser().parse("gas station", SearchMode::Digital);
        assert_eq!(parsed.category_code, None);
        assert_eq!(parsed.suggested_mode, Some(SearchMode::Operational));
    }
}
