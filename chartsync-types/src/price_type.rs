use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SyncError;

/// Which price stream a candle request reads from.
///
/// Derivatives venues publish several candle streams per contract; spot
/// markets only have trade candles (`Ohlcv`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    /// Trade candles with volume.
    #[default]
    Ohlcv,
    /// Mark price candles.
    Mark,
    /// Index price candles.
    Index,
    /// Premium index candles.
    PremiumIndex,
}

impl PriceType {
    /// All price types, default first.
    pub const ALL: [Self; 4] = [Self::Ohlcv, Self::Mark, Self::Index, Self::PremiumIndex];

    /// Stable upper-case label as used by the dashboard selectors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ohlcv => "OHLCV",
            Self::Mark => "MARK",
            Self::Index => "INDEX",
            Self::PremiumIndex => "PREMIUM_INDEX",
        }
    }

    /// Parse a label, falling back to [`PriceType::Ohlcv`] for anything unknown.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == upper)
            .ok_or_else(|| SyncError::InvalidArg(format!("unknown price type: {s}")))
    }
}
