//! Server configuration: YAML file layered under `NXTOWNER__` environment variables

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// JSON array of listing records served by the in-memory backend
    #[serde(default)]
    pub listings_path: Option<PathBuf>,

    #[serde(default)]
    pub listing_search: listing_search::config::Config,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8087".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_level() -> String {
    "info,listing_search=debug".to_string()
}

impl AppConfig {
    /// Load from an optional YAML file, then `NXTOWNER__SECTION__KEY` overrides
    pub fn load(path: &Path) -> Result<Self> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("NXTOWNER__").split("__"))
            .extract()
            .with_context(|| format!("failed to load configuration from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/nxtowner.yaml")).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:8087");
        assert_eq!(cfg.listing_search.max_page_size, 60);
    }

    #[test]
    fn test_yaml_file_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.yaml");
        std::fs::write(
            &path,
            "server:\n  bind: 0.0.0.0:9000\n  request_timeout: 5s\nlogging:\n  json: true\nlisting_search:\n  default_page_size: 12\n  ai:\n    timeout: 3s\n",
        )
        .unwrap();

        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert_eq!(cfg.server.request_timeout, Duration::from_secs(5));
        assert!(cfg.logging.json);
        assert_eq!(cfg.listing_search.default_page_size, 12);
        assert_eq!(cfg.listing_search.ai.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.yaml");
        std::fs::write(&path, "database:\n  url: postgres://localhost\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
