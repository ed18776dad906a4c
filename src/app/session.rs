use crate::adapters::ContentGateway;
use crate::config::SiteConfig;
use crate::core::cache::ContentCache;
use crate::core::newsletter::NewsletterForm;
use crate::core::rotation::HeroCarousel;
use crate::core::search::{DebouncedSearch, SearchService};
use crate::core::store::{Action, Store};
use crate::domain::locale::{Route, RouteError};
use crate::domain::ports::{AssumeOnline, ConfigProvider, Connectivity, ContentSource};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;

/// Everything one browsing session shares: the store, the backend handle
/// and the settings the timed components read.
#[derive(Clone)]
pub struct SiteSession {
    config: SiteConfig,
    store: Store,
    source: Arc<dyn ContentSource>,
    connectivity: Arc<dyn Connectivity>,
}

impl SiteSession {
    pub fn connect(config: SiteConfig) -> Result<Self> {
        config.validate()?;
        let gateway = ContentGateway::new(&config)?;
        tracing::info!("Content backend at {}", gateway.origin());
        Ok(Self::with_source(config, Arc::new(gateway)))
    }

    pub fn with_source(config: SiteConfig, source: Arc<dyn ContentSource>) -> Self {
        Self {
            config,
            store: Store::new(),
            source,
            connectivity: Arc::new(AssumeOnline),
        }
    }

    pub fn with_connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn source(&self) -> &dyn ContentSource {
        self.source.as_ref()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn cache(&self) -> ContentCache {
        ContentCache::new(self.store.clone(), self.source.clone())
    }

    pub fn search(&self) -> SearchService {
        SearchService::new(self.store.clone(), self.source.clone())
    }

    pub fn debounced_search(&self) -> DebouncedSearch {
        DebouncedSearch::new(self.search(), self.config.search_debounce())
    }

    pub fn newsletter_form(&self) -> NewsletterForm {
        NewsletterForm::new(self.source.clone(), self.connectivity.clone())
    }

    /// Starts the hero rotation. It shows placeholders until videos reach
    /// the store, then rotates whatever list the store holds.
    pub fn hero_carousel(&self) -> HeroCarousel {
        HeroCarousel::follow(&self.store, self.config.rotation_interval())
    }

    /// Resolves a locale-prefixed path, switches the active language and
    /// closes any open overlay.
    pub fn navigate(&self, path: &str) -> std::result::Result<Route, RouteError> {
        let route = Route::parse(path)?;
        self.store.dispatch(Action::SetLanguage(route.locale));
        self.store.dispatch(Action::CloseAll);
        Ok(route)
    }
}
