use std::future::Future;
use std::sync::Arc;

use chartsync_core::time::TimeContext;
use chartsync_core::{
    CandleSource, PriceType, RandomWalkConfig, RecoveryHook, SyncConfig, SyncError,
};
use tokio::sync::Semaphore;

use crate::random::RANDOM_SYMBOL;

/// Orchestrator that syncs candle caches and composes instruments.
pub struct ChartSync {
    pub(crate) source: Option<Arc<dyn CandleSource>>,
    pub(crate) recovery: Option<Arc<dyn RecoveryHook>>,
    pub(crate) cfg: SyncConfig,
    pub(crate) time: TimeContext,
    pub(crate) permits: Arc<Semaphore>,
}

/// Builder for constructing a [`ChartSync`] with custom configuration.
pub struct ChartSyncBuilder {
    source: Option<Arc<dyn CandleSource>>,
    recovery: Option<Arc<dyn RecoveryHook>>,
    cfg: SyncConfig,
}

impl Default for ChartSyncBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSyncBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Starts without a source: only the `RANDOM` instrument can be synced
    /// until one is registered with [`with_source`](Self::with_source). The
    /// local offset defaults to the host's offset captured now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            recovery: None,
            cfg: SyncConfig::default(),
        }
    }

    /// Register the candle source.
    ///
    /// A second call replaces the first source. Wrap the source with
    /// [`SourceBuilder`](crate::SourceBuilder) before registering it to cache
    /// the instrument catalogue or add custom layers.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn CandleSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Register the connection-recovery hook invoked after transient source
    /// failures.
    #[must_use]
    pub fn recovery_hook(mut self, hook: Arc<dyn RecoveryHook>) -> Self {
        self.recovery = Some(hook);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: SyncConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Offset of local time from UTC, in seconds.
    ///
    /// Cached timestamps live in this local domain; source requests are made
    /// in UTC.
    #[must_use]
    pub const fn utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.cfg.utc_offset_seconds = seconds;
        self
    }

    /// Maximum number of source calls in flight at once.
    #[must_use]
    pub const fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.cfg.max_concurrent_fetches = n;
        self
    }

    /// Cap on the number of candles requested per page.
    ///
    /// Pagination continues until the range is covered, so a smaller page only
    /// trades more round trips for smaller responses.
    #[must_use]
    pub const fn page_limit(mut self, limit: usize) -> Self {
        self.cfg.page_limit = Some(limit);
        self
    }

    /// Parameters of the `RANDOM` generator.
    #[must_use]
    pub const fn random_walk(mut self, cfg: RandomWalkConfig) -> Self {
        self.cfg.random_walk = cfg;
        self
    }

    /// Build the [`ChartSync`] orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `max_concurrent_fetches` or `page_limit` is zero.
    pub fn build(self) -> Result<ChartSync, SyncError> {
        if self.cfg.max_concurrent_fetches == 0 {
            return Err(SyncError::InvalidArg(
                "max_concurrent_fetches must be at least 1".to_string(),
            ));
        }
        if self.cfg.page_limit == Some(0) {
            return Err(SyncError::InvalidArg(
                "page_limit must be at least 1".to_string(),
            ));
        }
        Ok(ChartSync {
            source: self.source,
            recovery: self.recovery,
            time: TimeContext::from_config(&self.cfg),
            permits: Arc::new(Semaphore::new(self.cfg.max_concurrent_fetches)),
            cfg: self.cfg,
        })
    }
}

impl ChartSync {
    /// Start building a new `ChartSync` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// let sync = chartsync::ChartSync::builder()
    ///     .with_source(Arc::new(my_exchange_client))
    ///     .recovery_hook(Arc::new(reconnect))
    ///     .max_concurrent_fetches(2)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> ChartSyncBuilder {
        ChartSyncBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.cfg
    }

    /// The local-time context used for cached timestamps.
    #[must_use]
    pub const fn time_context(&self) -> TimeContext {
        self.time
    }

    /// True when a candle source is registered.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    /// Name of the registered source.
    #[must_use]
    pub fn source_name(&self) -> Option<&'static str> {
        self.source.as_ref().map(|s| s.name())
    }

    /// Instruments that can be synced: the source catalogue plus `RANDOM`.
    ///
    /// A source without a catalogue, or no source at all, yields only `RANDOM`.
    ///
    /// # Errors
    /// Returns the source's error, tagged with its name, when listing fails for
    /// any reason other than the capability being unsupported.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "chartsync::core::contracts", skip(self))
    )]
    pub async fn contracts(&self) -> Result<Vec<String>, SyncError> {
        let mut out = if self.source.is_some() {
            match self
                .dispatch(|source| async move { source.symbols().await })
                .await
            {
                Ok(list) => list,
                Err(e) => match e.into_inner() {
                    SyncError::Unsupported { .. } => Vec::new(),
                    other => {
                        let name = self.source_name().unwrap_or("unknown");
                        return Err(SyncError::source(name, other));
                    }
                },
            }
        } else {
            Vec::new()
        };
        if !out.iter().any(|s| s == RANDOM_SYMBOL) {
            out.push(RANDOM_SYMBOL.to_string());
        }
        Ok(out)
    }

    /// Price type actually requested from the source for `requested`.
    ///
    /// Falls back to trade candles when the source does not serve the stream.
    pub(crate) fn effective_price_type(&self, requested: PriceType) -> PriceType {
        match &self.source {
            Some(s) if !s.supports_price_type(requested) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    source = s.name(),
                    requested = %requested,
                    "price type not supported; using OHLCV"
                );
                PriceType::Ohlcv
            }
            _ => requested,
        }
    }

    /// Run one source call on a spawned task once a dispatch permit is free.
    ///
    /// Errors from the source are tagged with its name; a task that panics or
    /// is cancelled surfaces as `Other`.
    pub(crate) async fn dispatch<T, F, Fut>(&self, call: F) -> Result<T, SyncError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn CandleSource>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, SyncError>> + Send + 'static,
    {
        let source = self.source.clone().ok_or(SyncError::NotConnected)?;
        let name = source.name();
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| SyncError::Other(format!("dispatch pool closed: {e}")))?;
        let task = tokio::spawn(async move {
            let _permit = permit;
            call(source).await
        });
        match task.await {
            Ok(res) => res.map_err(|e| SyncError::source(name, e)),
            Err(e) => Err(SyncError::Other(format!("{name} task failed: {e}"))),
        }
    }

    /// Log a failed cycle and run the recovery hook when the failure is
    /// transient.
    pub(crate) async fn report_failure(&self, what: &str, err: &SyncError) {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            target: "chartsync",
            what,
            error = %err,
            transient = err.is_transient(),
            "sync cycle abandoned"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = what;
        if err.is_transient()
            && let Some(hook) = &self.recovery
        {
            hook.recover().await;
        }
    }
}
