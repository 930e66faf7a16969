//! Builder for composing a candle source with middleware layers.
//!
//! # Ordering
//!
//! Layers form an onion around the raw source:
//!
//! ```text
//! Engine request
//!     ↓
//! Outermost layer (sees the request first, the result last)
//!     ↓
//! Inner layer (e.g. the catalogue cache)
//!     ↓
//! Raw source (the exchange client)
//! ```
//!
//! Layers are stored outermost first. Every `with_*` or `layer` call inserts
//! at the outermost position, so the last layer added wraps all earlier ones:
//!
//! ```text
//! builder.with_cache(..).layer(Box::new(Logging))
//!
//! Storage: [Logging, CachingSource]
//! Result:  Logging(CachingSource(Raw))
//! ```

use std::sync::Arc;

use chartsync_core::{CacheConfig, CandleSource, Middleware};

use crate::cache::CacheMiddleware;

/// Composes a raw source with the catalogue cache or custom layers.
pub struct SourceBuilder {
    raw: Arc<dyn CandleSource>,
    layers: Vec<Box<dyn Middleware>>,
}

impl SourceBuilder {
    /// Start from a raw, unwrapped source.
    #[must_use]
    pub fn new(raw: Arc<dyn CandleSource>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    fn without(mut self, name: &str) -> Self {
        self.layers.retain(|m| m.name() != name);
        self
    }

    /// Add or replace the catalogue cache at the outermost position.
    #[must_use]
    pub fn with_cache(self, cfg: &CacheConfig) -> Self {
        self.without(CacheMiddleware::NAME)
            .layer(Box::new(CacheMiddleware::new(cfg.clone())))
    }

    /// Remove the catalogue cache if present.
    #[must_use]
    pub fn without_cache(self) -> Self {
        self.without(CacheMiddleware::NAME)
    }

    /// Add an arbitrary layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Layer names, outermost first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.name()).collect()
    }

    /// Wrap the raw source, innermost layer first.
    #[must_use]
    pub fn build(self) -> Arc<dyn CandleSource> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            source = self.raw.name(),
            layers = ?self.layer_names(),
            "source stack built"
        );
        let mut acc = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
