//! Instrument string classification: spot pairs, linear and inverse contracts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Quote coins recognized at the end of a slash-less contract name.
pub const QUOTE_COINS: [&str; 12] = [
    "USDT", "USD", "USDC", "PERP", "USDE", "EUR", "BRL", "BTC", "ETH", "DAI", "BRZ", "FDUSD",
];

/// Market an instrument trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    /// Spot pair, `BASE/QUOTE`.
    Spot,
    /// Contract margined and settled in the quote coin.
    Linear,
    /// Contract margined and settled in the base coin.
    Inverse,
}

impl MarketType {
    /// Lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Linear => "linear",
            Self::Inverse => "inverse",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of an instrument string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    /// Base coin.
    pub base: String,
    /// Quote coin.
    pub quote: String,
    /// Market the instrument trades on.
    pub market_type: MarketType,
}

/// Classify an instrument string into base, quote and market type.
///
/// - `BASE/QUOTE` is spot.
/// - `BASE/QUOTE:SETTLE[-EXPIRY]` is inverse when the settle part starts with
///   the base coin followed by a non-alphanumeric character (or nothing),
///   linear otherwise.
/// - A slash-less name ending in one of [`QUOTE_COINS`] is linear; the longest
///   matching suffix wins and `PERP` settles in `USDC`.
///
/// Characters other than ASCII alphanumerics and `/`, `:`, `-` are ignored.
/// Returns `None` for anything else.
#[must_use]
pub fn parse_contract(text: &str) -> Option<Contract> {
    let cleaned: String = text
        .to_ascii_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | ':'))
        .collect();
    let mut parts = cleaned.split('/');
    let head = parts.next()?;
    let Some(rest) = parts.next() else {
        return parse_slashless(head);
    };
    if head.is_empty() {
        return None;
    }
    let (quote, market_type) = match rest.split_once(':') {
        Some((quote, settle)) => {
            let inverse = settle.strip_prefix(head).is_some_and(|tail| {
                !tail
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric())
            });
            let mt = if inverse {
                MarketType::Inverse
            } else {
                MarketType::Linear
            };
            (quote, mt)
        }
        None => (rest, MarketType::Spot),
    };
    if quote.is_empty() {
        return None;
    }
    Some(Contract {
        base: head.to_string(),
        quote: quote.to_string(),
        market_type,
    })
}

fn parse_slashless(symbol: &str) -> Option<Contract> {
    let coin = QUOTE_COINS
        .iter()
        .filter(|coin| symbol.ends_with(*coin))
        .max_by_key(|coin| coin.len())?;
    let base = symbol.rfind(coin).map_or(symbol, |idx| &symbol[..idx]);
    let base = if base.is_empty() { symbol } else { base };
    let quote = if *coin == "PERP" { "USDC" } else { *coin };
    Some(Contract {
        base: base.to_string(),
        quote: quote.to_string(),
        market_type: MarketType::Linear,
    })
}
