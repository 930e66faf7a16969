//! Incremental fetch-merge: page a source until a date range is covered and
//! append the new candles to a caller-owned cache.

use chartsync_core::time::{candle_count, to_millis};
use chartsync_core::{
    Candle, CandleRequest, OhlcvCache, PriceType, SyncError, Timeframe, Timestamp,
    dedup_strictly_ascending,
};

use crate::core::ChartSync;
use crate::random::{is_random, random_walk};

/// Parameters of one incremental sync.
///
/// `date_from` and `date_to` are local-time epoch values in seconds or
/// milliseconds; the unit is inferred per value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncRequest {
    /// Instrument identifier, or `RANDOM`.
    pub symbol: String,
    /// Candle duration.
    pub timeframe: Timeframe,
    /// Start of the wanted range, local time.
    pub date_from: Timestamp,
    /// End of the wanted range, local time.
    pub date_to: Timestamp,
    /// Price stream to read.
    pub price_type: PriceType,
}

impl SyncRequest {
    /// A trade-candle request for `symbol` over `[date_from, date_to)`.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        date_from: Timestamp,
        date_to: Timestamp,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            date_from,
            date_to,
            price_type: PriceType::Ohlcv,
        }
    }

    /// Read a different price stream.
    #[must_use]
    pub fn with_price_type(mut self, price_type: PriceType) -> Self {
        self.price_type = price_type;
        self
    }
}

/// New rows for a cache, already deduplicated and in local time.
pub(crate) struct Fetched {
    pub(crate) rows: Vec<Candle>,
    /// Start of the range in local milliseconds, moved forward when the
    /// instrument starts later than requested.
    pub(crate) date_from: Timestamp,
}

/// Candles still missing from a cache holding `held` rows.
///
/// A cache already holding exactly the range still asks for one candle so the
/// newest (possibly unfinished) candle is refreshed.
pub(crate) fn candles_needed(tf: Timeframe, from: Timestamp, to: Timestamp, held: usize) -> i64 {
    let count = candle_count(tf, from, to);
    let held = i64::try_from(held).unwrap_or(i64::MAX);
    count.saturating_sub(held) + i64::from(held == count)
}

impl ChartSync {
    /// Sync `cache` with the source over the requested range.
    ///
    /// Returns the effective start of the range in local milliseconds. It is
    /// later than requested when the instrument's first candle is later than
    /// `date_from` and the cache was empty.
    ///
    /// # Errors
    /// Returns the source's error (tagged with its name), `NotConnected` when
    /// no source is registered, or `Other` when a source task panics. The
    /// cache is untouched on error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "chartsync::engine::try_sync",
            skip(self, cache),
            fields(symbol = %req.symbol, timeframe = %req.timeframe, held = cache.len()),
        )
    )]
    pub async fn try_sync(
        &self,
        req: &SyncRequest,
        cache: &mut OhlcvCache,
    ) -> Result<Timestamp, SyncError> {
        let fetched = self.fetch_rows(req, cache.len(), cache.last_ts()).await?;
        cache.merge(fetched.rows);
        Ok(fetched.date_from)
    }

    /// Like [`try_sync`](Self::try_sync) but never fails.
    ///
    /// On error the failure is logged, the recovery hook runs if the failure
    /// is transient, the cache is left as it was and the requested
    /// `date_from` (in milliseconds) is returned.
    pub async fn sync(&self, req: &SyncRequest, cache: &mut OhlcvCache) -> Timestamp {
        match self.try_sync(req, cache).await {
            Ok(date_from) => date_from,
            Err(e) => {
                self.report_failure(&req.symbol, &e).await;
                to_millis(req.date_from)
            }
        }
    }

    /// Sync a copy of `cache`, leaving the original untouched.
    pub async fn synced(&self, req: &SyncRequest, cache: &OhlcvCache) -> (OhlcvCache, Timestamp) {
        let mut copy = cache.clone();
        let date_from = self.sync(req, &mut copy).await;
        (copy, date_from)
    }

    /// Page through the source until the range is covered.
    ///
    /// `held` and `last_ts` describe the cache being extended; `last_ts` is
    /// local time and becomes the inclusive cursor of the first request.
    pub(crate) async fn fetch_rows(
        &self,
        req: &SyncRequest,
        held: usize,
        last_ts: Option<Timestamp>,
    ) -> Result<Fetched, SyncError> {
        let tf = req.timeframe;
        let date_to = to_millis(req.date_to);
        let mut date_from = to_millis(req.date_from);
        let mut needed = candles_needed(tf, date_from, date_to, held);
        if needed <= 0 {
            return Ok(Fetched {
                rows: Vec::new(),
                date_from,
            });
        }

        let price_type = self.effective_price_type(req.price_type);
        let mut cursor = self.time.to_utc(last_ts.unwrap_or(date_from));
        let mut pages: Vec<Candle> = Vec::new();
        let mut snapped = false;
        loop {
            let page = self
                .fetch_page(
                    CandleRequest {
                        symbol: req.symbol.clone(),
                        timeframe: tf,
                        since: cursor,
                        limit: self.page_size(needed),
                        price_type,
                    },
                    self.time.to_utc(date_from),
                )
                .await?;
            let (Some(first), Some(last)) = (page.first(), page.last()) else {
                break;
            };
            let (first_ts, trailing) = (first.ts, last.ts);

            if !snapped && held == 0 && pages.is_empty() {
                let first_local = self.time.to_local(first_ts);
                if date_from < first_local {
                    // Instrument listed after the requested start.
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        symbol = %req.symbol,
                        requested = date_from,
                        listed = first_local,
                        "snapping date_from"
                    );
                    snapped = true;
                    date_from = first_local;
                    needed = candles_needed(tf, date_from, date_to, held);
                    if needed <= 0 {
                        return Ok(Fetched {
                            rows: Vec::new(),
                            date_from,
                        });
                    }
                    continue;
                }
            }

            needed = needed.saturating_sub(i64::try_from(page.len()).unwrap_or(i64::MAX));
            pages.extend(page);
            if needed <= 0 {
                break;
            }
            if trailing <= cursor {
                #[cfg(feature = "tracing")]
                tracing::debug!(symbol = %req.symbol, cursor, "source stalled; stopping pagination");
                break;
            }
            cursor = trailing;
        }

        let rows = dedup_strictly_ascending(pages)
            .into_iter()
            .map(|c| {
                let ts = self.time.to_local(c.ts);
                c.with_ts(ts)
            })
            .collect();
        Ok(Fetched { rows, date_from })
    }

    /// One source page; `RANDOM` pages come from the walk anchored at `anchor`.
    async fn fetch_page(
        &self,
        req: CandleRequest,
        anchor: Timestamp,
    ) -> Result<Vec<Candle>, SyncError> {
        if is_random(&req.symbol) {
            return Ok(random_walk(
                &self.cfg.random_walk,
                req.timeframe,
                anchor,
                req.since,
                req.limit,
            ));
        }
        self.dispatch(move |source| async move { source.fetch_candles(&req).await })
            .await
    }

    fn page_size(&self, needed: i64) -> usize {
        let wanted = usize::try_from(needed).unwrap_or(usize::MAX);
        self.cfg.page_limit.map_or(wanted, |cap| wanted.min(cap))
    }
}
