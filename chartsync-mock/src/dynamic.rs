use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use chartsync_core::{Candle, CandleRequest, CandleSource, PriceType, SyncError};

/// Instruction for how `fetch_candles` should behave for a symbol.
#[derive(Clone)]
pub enum MockBehavior {
    /// Serve pages from this ascending series like a real paginated source:
    /// rows at or after `since`, at most `limit` of them.
    Series(Vec<Candle>),
    /// Return exactly these rows whatever the request asks for.
    Fixed(Vec<Candle>),
    /// Fail immediately with the provided error.
    Fail(SyncError),
    /// Hang indefinitely (simulate a stalled connection).
    Hang,
    /// Panic inside the source call.
    Panic,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    requests: Vec<CandleRequest>,
    symbols: Option<Vec<String>>,
    latency: Option<Duration>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
    price_types: PriceTypes,
}

// Read from the synchronous `supports_price_type`, hence a std mutex.
type PriceTypes = Arc<std::sync::Mutex<Option<HashSet<PriceType>>>>;

impl DynamicMockController {
    /// Set the behavior of `fetch_candles` for a symbol.
    pub async fn set_behavior(&self, symbol: impl Into<String>, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(symbol.into(), behavior);
    }

    /// Set the catalogue returned by `symbols`; `None` makes it unsupported.
    pub async fn set_symbols(&self, symbols: Option<Vec<String>>) {
        self.state.lock().await.symbols = symbols;
    }

    /// Restrict the price streams the source claims to serve.
    pub fn set_price_types(&self, price_types: &[PriceType]) {
        let mut guard = self.price_types.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(price_types.iter().copied().collect());
    }

    /// Delay every `fetch_candles` call by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        self.state.lock().await.latency = Some(latency);
    }

    /// Copy of every candle request received so far.
    pub async fn requests(&self) -> Vec<CandleRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Highest number of `fetch_candles` calls observed running at once.
    pub async fn max_in_flight(&self) -> usize {
        self.state.lock().await.max_in_flight
    }

    /// Clear all configured behaviors and the request log.
    pub async fn clear_all_behaviors(&self) {
        *self.state.lock().await = InternalState::default();
        *self.price_types.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// A source that defers all behavior to an external controller.
///
/// Symbols without a configured behavior answer with an empty page.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
    price_types: PriceTypes,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn CandleSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let price_types = PriceTypes::default();
        let controller = DynamicMockController {
            state: Arc::clone(&state),
            price_types: Arc::clone(&price_types),
        };
        let me = Arc::new(Self {
            name,
            state,
            price_types,
        });
        (me as Arc<dyn CandleSource>, controller)
    }

    async fn finish(&self) {
        let mut guard = self.state.lock().await;
        guard.in_flight = guard.in_flight.saturating_sub(1);
    }
}

#[async_trait]
impl CandleSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, SyncError> {
        // Snapshot under the lock; never hold it across the simulated latency.
        let (behavior, latency) = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            guard.in_flight += 1;
            guard.max_in_flight = guard.max_in_flight.max(guard.in_flight);
            (guard.rules.get(&req.symbol).cloned(), guard.latency)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let out = match behavior {
            None => Ok(Vec::new()),
            Some(MockBehavior::Series(rows)) => Ok(rows
                .into_iter()
                .filter(|c| c.ts >= req.since)
                .take(req.limit)
                .collect()),
            Some(MockBehavior::Fixed(rows)) => Ok(rows),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                Ok(Vec::new())
            }
            Some(MockBehavior::Panic) => {
                self.finish().await;
                panic!("dynamic mock: forced panic for {}", req.symbol)
            }
        };
        self.finish().await;
        out
    }

    fn supports_price_type(&self, price_type: PriceType) -> bool {
        self.price_types
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_none_or(|set| set.contains(&price_type))
    }

    async fn symbols(&self) -> Result<Vec<String>, SyncError> {
        self.state
            .lock()
            .await
            .symbols
            .clone()
            .ok_or_else(|| SyncError::unsupported("symbols"))
    }
}
