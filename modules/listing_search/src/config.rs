//! Configuration for the listing search module

use crate::domain::sanitizer::SanitizerLimits;
use crate::domain::taxonomy::Taxonomy;
use crate::contract::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Listing search configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Page size used when a request does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Hard cap on page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Highest page number a request may ask for
    #[serde(default = "default_max_page")]
    pub max_page: u32,

    /// Free-text queries are truncated to this many characters
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// YAML taxonomy replacing the built-in one
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,

    #[serde(default)]
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_page: default_max_page(),
            max_query_length: default_max_query_length(),
            taxonomy_path: None,
            ai: AiConfig::default(),
        }
    }
}

impl Config {
    pub fn limits(&self) -> SanitizerLimits {
        SanitizerLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            max_page: self.max_page,
            max_query_length: self.max_query_length,
        }
    }

    /// Load the configured taxonomy, or the built-in one
    pub fn load_taxonomy(&self) -> anyhow::Result<Taxonomy> {
        match &self.taxonomy_path {
            Some(path) => Taxonomy::from_path(path),
            None => Taxonomy::builtin(),
        }
    }
}

/// Generative filter extraction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiConfig {
    #[serde(default)]
    pub enabled: bool,

    /// OpenAI-compatible API root, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout: default_timeout(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_max_page() -> u32 {
    1000
}

fn default_max_query_length() -> usize {
    200
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.limits(), SanitizerLimits::default());
        assert!(!cfg.ai.enabled);
        assert_eq!(cfg.ai.timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_overrides_and_humantime() {
        let cfg: Config = serde_yaml::from_str(
            "max_page_size: 40\nai:\n  enabled: true\n  model: local-model\n  timeout: 1500ms\n",
        )
        .unwrap();
        assert_eq!(cfg.max_page_size, 40);
        assert!(cfg.ai.enabled);
        assert_eq!(cfg.ai.model, "local-model");
        assert_eq!(cfg.ai.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_yaml::from_str::<Config>("page_limit: 10").is_err());
        assert!(serde_yaml::from_str::<Config>("ai:\n  key: abc").is_err());
    }

    #[test]
    fn test_taxonomy_path_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.yaml");
        std::fs::write(
            &path,
            "categories:\n  - code: laundromats\n    label: Laundromats\n    mode: operational\n",
        )
        .unwrap();
        let cfg = Config {
            taxonomy_path: Some(path),
            ..Config::default()
        };
        let taxonomy = cfg.load_taxonomy().unwrap();
        assert!(taxonomy.category("laundromats").is_some());
        assert!(taxonomy.category("fuel_auto").is_none());
    }

    #[test]
    fn test_missing_taxonomy_file_fails() {
        let cfg = Config {
            taxonomy_path: Some(PathBuf::from("/nonexistent/taxonomy.yaml")),
            ..Config::default()
        };
        assert!(cfg.load_taxonomy().is_err());
    }
}
