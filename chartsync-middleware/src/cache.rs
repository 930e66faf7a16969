//! TTL cache for the instrument catalogue.
//!
//! The catalogue is a single value per source, so the store holds at most one
//! entry under the unit key.

use std::sync::Arc;

use async_trait::async_trait;
use chartsync_core::{
    CacheConfig, Candle, CandleRequest, CandleSource, Capability, Middleware, PriceType, SyncError,
};
use moka::future::Cache;

/// Wrapper that caches the instrument catalogue for a configured TTL.
///
/// Candle pages always pass through. Failed catalogue lookups are not cached.
pub struct CachingSource {
    inner: Arc<dyn CandleSource>,
    symbols: Option<Cache<(), Arc<Vec<String>>>>,
}

impl CachingSource {
    /// Wrap `inner`; a zero catalogue TTL disables the cache entirely.
    #[must_use]
    pub fn new(inner: Arc<dyn CandleSource>, cfg: &CacheConfig) -> Self {
        let symbols = cfg
            .ttl_for(Capability::Symbols)
            .map(|ttl| Cache::builder().max_capacity(1).time_to_live(ttl).build());
        Self { inner, symbols }
    }

    /// Drop any cached catalogue.
    pub fn invalidate(&self) {
        if let Some(store) = &self.symbols {
            store.invalidate_all();
        }
    }
}

#[async_trait]
impl CandleSource for CachingSource {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, SyncError> {
        self.inner.fetch_candles(req).await
    }

    fn supports_price_type(&self, price_type: PriceType) -> bool {
        self.inner.supports_price_type(price_type)
    }

    async fn symbols(&self) -> Result<Vec<String>, SyncError> {
        let Some(store) = &self.symbols else {
            return self.inner.symbols().await;
        };
        if let Some(hit) = store.get(&()).await {
            #[cfg(feature = "tracing")]
            tracing::trace!(source = self.inner.name(), "catalogue cache hit");
            return Ok(hit.as_ref().clone());
        }
        let fresh = self.inner.symbols().await?;
        store.insert((), Arc::new(fresh.clone())).await;
        Ok(fresh)
    }
}

/// Middleware config for constructing a [`CachingSource`].
pub struct CacheMiddleware {
    /// Cache settings applied to the wrapped source.
    pub cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Cache layer with the given settings.
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }

    pub(crate) const NAME: &'static str = "CachingSource";
}

impl Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn CandleSource>) -> Arc<dyn CandleSource> {
        let Self { cfg } = *self;
        Arc::new(CachingSource::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
