//! Synthetic instruments: arithmetic expressions over synced series.

mod eval;
mod lexer;
mod parser;
mod symbols;

use chartsync_core::time::to_millis;
#[cfg(feature = "tracing")]
use chartsync_core::parse_contract;
use chartsync_core::{AlgebraicSeries, ChartPoint, PriceType, SyncError, Timeframe, Timestamp};

use crate::core::ChartSync;
use crate::engine::SyncRequest;

pub use symbols::{extract_symbols, symbol_identifier};

/// Parameters of one composition cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComposeRequest {
    /// Expression over instrument symbols, e.g. `BTC/USDT - 0.5*ETH/USDT`.
    pub expression: String,
    /// Candle duration shared by every constituent.
    pub timeframe: Timeframe,
    /// Start of the wanted range, local time.
    pub date_from: Timestamp,
    /// End of the wanted range, local time.
    pub date_to: Timestamp,
    /// Price stream read for every constituent.
    pub price_type: PriceType,
}

impl ComposeRequest {
    /// A trade-candle composition of `expression` over `[date_from, date_to)`.
    #[must_use]
    pub fn new(
        expression: impl Into<String>,
        timeframe: Timeframe,
        date_from: Timestamp,
        date_to: Timestamp,
    ) -> Self {
        Self {
            expression: expression.into(),
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

impl ChartSync {
    /// Evaluate `req.expression` and merge the result into `chart`.
    ///
    /// Every symbol is synced independently, continuing from the last
    /// timestamp in `chart`. The rows of the result replace `chart` from the
    /// first point sharing the result's first timestamp onwards. Returns the
    /// most advanced effective `date_from`, in local milliseconds.
    ///
    /// A symbol whose sync fails is logged and left unbound, so an expression
    /// that uses it fails with `UnknownIdentifier`.
    ///
    /// # Errors
    /// Returns `Syntax` for malformed or non-arithmetic expressions,
    /// `UnknownIdentifier` for names without a synced series, and
    /// `NotASeries` when the expression evaluates to a plain number. `chart`
    /// is untouched on error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "chartsync::compose::try_compose",
            skip(self, chart),
            fields(expression = %req.expression, timeframe = %req.timeframe, held = chart.len()),
        )
    )]
    pub async fn try_compose(
        &self,
        req: &ComposeRequest,
        chart: &mut Vec<ChartPoint>,
    ) -> Result<Timestamp, SyncError> {
        let expression = req.expression.to_ascii_uppercase();
        let symbols = extract_symbols(&expression);
        let ast = parser::parse(&symbols::substitute(&expression, &symbols))?;

        let held = chart.len();
        let anchor = chart.last().map(|p| p.timestamp);
        let mut date_from = req.date_from;
        let mut effective = to_millis(req.date_from);
        let mut env = eval::Env::new();
        for symbol in &symbols {
            let sreq = SyncRequest {
                symbol: symbol.clone(),
                timeframe: req.timeframe,
                date_from,
                date_to: req.date_to,
                price_type: req.price_type,
            };
            match self.fetch_rows(&sreq, held, anchor).await {
                Ok(fetched) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        symbol = %symbol,
                        rows = fetched.rows.len(),
                        contract = ?parse_contract(symbol),
                        "constituent synced"
                    );
                    date_from = fetched.date_from;
                    effective = effective.max(fetched.date_from);
                    env.insert(
                        symbol_identifier(symbol),
                        AlgebraicSeries::new(fetched.rows),
                    );
                }
                Err(e) => self.report_failure(symbol, &e).await,
            }
        }

        let result = eval::evaluate(&ast, &env)?.into_series()?;
        reconcile(chart, &result);
        Ok(effective)
    }

    /// Like [`try_compose`](Self::try_compose) but never fails.
    ///
    /// On error the failure is logged and `chart` is left as it was; the
    /// requested `date_from` (in milliseconds) is returned.
    pub async fn compose(&self, req: &ComposeRequest, chart: &mut Vec<ChartPoint>) -> Timestamp {
        match self.try_compose(req, chart).await {
            Ok(date_from) => date_from,
            Err(e) => {
                self.report_failure(&req.expression, &e).await;
                to_millis(req.date_from)
            }
        }
    }
}

/// Drop the stale tail of `chart` and append `result`.
///
/// The tail starts at the first point whose timestamp equals the result's
/// first timestamp; with no such point nothing is dropped.
fn reconcile(chart: &mut Vec<ChartPoint>, result: &AlgebraicSeries) {
    if let Some(first) = result.first_ts()
        && let Some(idx) = chart.iter().position(|p| p.timestamp == first)
    {
        chart.truncate(idx);
    }
    chart.extend(result.to_chart_points());
}
