//! Library registry loading through the cache.

use std::{sync::Arc, time::Duration};

use tracing::{info, instrument};

use crate::{
    application::{cache::RegistryCache, ports::RegistrySource},
    domain::Registry,
    error::SeedlingResult,
};

/// Cache key under which the registry is memoized.
pub const REGISTRY_CACHE_KEY: &str = "library-registry";

/// Loads the [`Registry`] from a [`RegistrySource`], memoized in a shared cache.
pub struct LibraryRegistryLoader {
    source: Box<dyn RegistrySource>,
    cache: Arc<RegistryCache<Registry>>,
    ttl: Duration,
}

impl LibraryRegistryLoader {
    /// Create a loader using the cache's default TTL.
    pub fn new(source: Box<dyn RegistrySource>, cache: Arc<RegistryCache<Registry>>) -> Self {
        let ttl = cache.default_ttl();
        Self { source, cache, ttl }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The cache this loader writes to.
    pub fn cache(&self) -> &Arc<RegistryCache<Registry>> {
        &self.cache
    }

    /// Load the registry.
    ///
    /// Within the TTL window this returns the same `Arc` without touching the
    /// source. Source failures come back as `ApplicationError::RegistryLoad`.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub fn load(&self) -> SeedlingResult<Arc<Registry>> {
        self.cache.get(REGISTRY_CACHE_KEY, self.ttl, || {
            let registry = self.source.fetch()?;
            info!(libraries = registry.len(), "library registry loaded");
            Ok(registry)
        })
    }
}
