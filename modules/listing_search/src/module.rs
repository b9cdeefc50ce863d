//! Module declaration and lifecycle

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::ListingSearchApi;
use crate::domain::{FilterExtractor, ListingSearchRepository, Service};
use crate::infra::ai::OpenAiFilterExtractor;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// Listing search module
pub struct ListingSearchModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for ListingSearchModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl ListingSearchModule {
    /// Build the domain service from typed config and a search backend
    pub fn init(
        &self,
        config: Config,
        repository: Arc<dyn ListingSearchRepository>,
    ) -> Result<Arc<Service>> {
        let taxonomy = Arc::new(config.load_taxonomy()?);

        let extractor: Option<Arc<dyn FilterExtractor>> = if config.ai.enabled {
            let extractor = OpenAiFilterExtractor::from_env(&config.ai, taxonomy.clone())
                .context("failed to configure AI filter extraction")?;
            tracing::info!(model = %config.ai.model, base_url = %config.ai.base_url, "AI filter extraction enabled");
            Some(Arc::new(extractor) as Arc<dyn FilterExtractor>)
        } else {
            tracing::info!("AI filter extraction disabled, using pattern parser only");
            None
        };

        let service = Arc::new(Service::new(taxonomy.clone(), config.limits(), repository, extractor)?);
        *self.config.write() = config;
        *self.service.write() = Some(service.clone());

        tracing::info!(categories = taxonomy.categories.len(), "Listing search initialized");
        Ok(service)
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules
    pub fn client(&self) -> Result<Arc<dyn ListingSearchApi>> {
        Ok(Arc::new(NativeClient::new(self.service()?)))
    }

    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        tracing::info!("Registering listing search REST routes");
        crate::api::rest::routes::register_routes(router, service)
    }
}
