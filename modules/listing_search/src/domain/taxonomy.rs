//! Listing taxonomy - the canonical category/subcategory allow-list
//!
//! The taxonomy is configuration data: it is loaded once (built-in default or
//! a YAML file named in the module config) and passed explicitly into the
//! parser and the sanitizer.

use crate::contract::SearchMode;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_TAXONOMY: &str = include_str!("../../taxonomy/default.yaml");

/// Canonical vocabulary for classifying and filtering listings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Taxonomy {
    /// Ordered category list; order is the parser's match priority
    pub categories: Vec<Category>,
    /// Ordered location list with aliases
    #[serde(default)]
    pub locations: Vec<LocationEntry>,
    /// Extra vocabulary used only for mode-mismatch detection
    #[serde(default)]
    pub signals: ModeSignals,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub code: String,
    pub label: String,
    pub mode: SearchMode,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subcategory {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationEntry {
    /// Canonical name returned for any alias
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeSignals {
    #[serde(default)]
    pub operational: Vec<String>,
    #[serde(default)]
    pub digital: Vec<String>,
}

impl ModeSignals {
    pub fn for_mode(&self, mode: SearchMode) -> &[String] {
        match mode {
            SearchMode::Operational => &self.operational,
            SearchMode::Digital => &self.digital,
        }
    }
}

impl Category {
    /// Look up a subcategory by code (exact) or label (case-insensitive)
    pub fn resolve_subcategory(&self, raw: &str) -> Option<&Subcategory> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        self.subcategories
            .iter()
            .find(|s| s.code == raw)
            .or_else(|| {
                self.subcategories.iter().find(|s| {
                    s.code.eq_ignore_ascii_case(raw) || s.label.to_lowercase() == raw.to_lowercase()
                })
            })
    }

    pub fn subcategory(&self, code: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.code == code)
    }
}

impl Taxonomy {
    /// The taxonomy shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_TAXONOMY).context("built-in taxonomy is invalid")
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let taxonomy: Self = serde_yaml::from_str(raw).context("failed to parse taxonomy YAML")?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read taxonomy file {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("invalid taxonomy file {}", path.display()))
    }

    /// Reject taxonomies the parser and sanitizer cannot use unambiguously
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            bail!("taxonomy must define at least one category");
        }

        let mut codes = HashSet::new();
        for category in &self.categories {
            if category.code.trim().is_empty() || category.label.trim().is_empty() {
                bail!("category code and label cannot be empty");
            }
            if !codes.insert(category.code.as_str()) {
                bail!("duplicate category code '{}'", category.code);
            }

            let mut sub_codes = HashSet::new();
            for sub in &category.subcategories {
                if sub.code.trim().is_empty() || sub.label.trim().is_empty() {
                    bail!(
                        "subcategory code and label cannot be empty (category '{}')",
                        category.code
                    );
                }
                if !sub_codes.insert(sub.code.as_str()) {
                    bail!(
                        "duplicate subcategory code '{}' in category '{}'",
                        sub.code,
                        category.code
                    );
                }
            }
        }

        for location in &self.locations {
            if location.name.trim().is_empty() {
                bail!("location name cannot be empty");
            }
        }

        Ok(())
    }

    /// Look up a category by canonical code
    pub fn category(&self, code: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.code == code)
    }

    /// Look up a category by code (exact) or label (case-insensitive)
    pub fn resolve_category(&self, raw: &str) -> Option<&Category> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        self.category(raw).or_else(|| {
            let lowered = raw.to_lowercase();
            self.categories.iter().find(|c| {
                c.code.eq_ignore_ascii_case(raw) || c.label.to_lowercase() == lowered
            })
        })
    }

    pub fn categories_for(&self, mode: SearchMode) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.mode == mode)
    }

    /// Whether `subcategory` is a valid child of `category`
    pub fn contains(&self, category: &str, subcategory: &str) -> bool {
        self.category(category)
            .and_then(|c| c.subcategory(subcategory))
            .is_some()
    }

    /// Map a whole location string onto its canonical name if it is a known
    /// name or alias
    pub fn canonical_location(&self, raw: &str) -> Option<&str> {
        let lowered = raw.trim().to_lowercase();
        self.locations
            .iter()
            .find(|entry| {
                entry.name.to_lowercase() == lowered
                    || entry.aliases.iter().any(|a| a.to_lowercase() == lowered)
            })
            .map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_taxonomy_loads() {
        let taxonomy = Taxonomy::builtin().unwrap();
        assert!(taxonomy.category("fuel_auto").is_some());
        assert!(taxonomy.contains("fuel_auto", "gas_stations"));
        assert!(taxonomy.contains("saas_software", "b2b_saas"));
        assert!(!taxonomy.contains("saas_software", "gas_stations"));
    }

    #[test]
    fn test_builtin_covers_both_modes() {
        let taxonomy = Taxonomy::builtin().unwrap();
        assert!(taxonomy.categories_for(SearchMode::Operational).count() > 0);
        assert!(taxonomy.categories_for(SearchMode::Digital).count() > 0);
        assert!(taxonomy
            .categories_for(SearchMode::Digital)
            .all(|c| c.mode == SearchMode::Digital));
    }

    #[test]
    fn test_resolve_category_by_label() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let category = taxonomy.resolve_category("  fuel & automotive ").unwrap();
        assert_eq!(category.code, "fuel_auto");
        assert!(taxonomy.resolve_category("Nonexistent Category").is_none());
        assert!(taxonomy.resolve_category("   ").is_none());
    }

    #[test]
    fn test_resolve_subcategory_by_label() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let category = taxonomy.category("fuel_auto").unwrap();
        assert_eq!(category.resolve_subcategory("Gas Stations").unwrap().code, "gas_stations");
        assert!(category.resolve_subcategory("b2b_saas").is_none());
    }

    #[test]
    fn test_canonical_location_aliases() {
        let taxonomy = Taxonomy::builtin().unwrap();
        assert_eq!(taxonomy.canonical_location("GTA"), Some("Ontario"));
        assert_eq!(taxonomy.canonical_location("ontario"), Some("Ontario"));
        assert_eq!(taxonomy.canonical_location("Springfield"), None);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let yaml = r#"
categories:
  - { code: a, label: A, mode: digital }
  - { code: a, label: Again, mode: operational }
"#;
        let err = Taxonomy::from_yaml_str(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate category code"));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let yaml = r#"
categories:
  - { code: a, label: A, mode: hybrid }
"#;
        assert!(Taxonomy::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_empty_taxonomy_rejected() {
        assert!(Taxonomy::from_yaml_str("categories: []").is_err());
    }
}
