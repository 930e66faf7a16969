//! Epoch unit inference, UTC/local conversion, and timeframe arithmetic.
//!
//! Timestamps are plain integers whose unit is inferred from their magnitude:
//! anything with more than ten decimal digits is milliseconds, everything else
//! is seconds. Upstream candle payloads and the chart layer both rely on this.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{SyncConfig, SyncError, Timestamp};

/// Smallest magnitude with eleven decimal digits. Values at or above it are
/// milliseconds.
pub const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Average Gregorian month (365.2425 / 12 days) in seconds.
pub const MONTH_SECONDS: i64 = 2_629_746;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether `ts` is a millisecond timestamp (more than ten decimal digits).
#[must_use]
pub const fn is_millis(ts: Timestamp) -> bool {
    ts.unsigned_abs() >= MILLIS_THRESHOLD.unsigned_abs()
}

/// Convert `ts` to seconds, dividing by 1000 when it carries more than ten digits.
///
/// A seconds value just under `10_000_000_000` (year 2286) stays in seconds.
#[must_use]
pub const fn normalize_timestamp(ts: Timestamp) -> Timestamp {
    if is_millis(ts) { ts / 1000 } else { ts }
}

/// Convert `ts` (either unit) to milliseconds.
#[must_use]
pub const fn to_millis(ts: Timestamp) -> Timestamp {
    normalize_timestamp(ts).saturating_mul(1000)
}

/// Explicit UTC offset context for local-time conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeContext {
    utc_offset_seconds: i32,
}

impl TimeContext {
    /// Context for a fixed offset east of UTC.
    #[must_use]
    pub const fn new(utc_offset_seconds: i32) -> Self {
        Self { utc_offset_seconds }
    }

    /// Context where local time equals UTC.
    #[must_use]
    pub const fn utc() -> Self {
        Self::new(0)
    }

    /// Context taken from the orchestrator configuration.
    #[must_use]
    pub const fn from_config(cfg: &SyncConfig) -> Self {
        Self::new(cfg.utc_offset_seconds)
    }

    /// Offset in seconds east of UTC.
    #[must_use]
    pub const fn offset_seconds(self) -> i32 {
        self.utc_offset_seconds
    }

    const fn scaled_offset(self, ts: Timestamp) -> i64 {
        let k = if is_millis(ts) { 1000 } else { 1 };
        self.utc_offset_seconds as i64 * k
    }

    /// Shift a UTC timestamp into the local domain, preserving its unit.
    #[must_use]
    pub const fn to_local(self, ts: Timestamp) -> Timestamp {
        ts.saturating_add(self.scaled_offset(ts))
    }

    /// Shift a local-domain timestamp back to UTC, preserving its unit.
    #[must_use]
    pub const fn to_utc(self, ts: Timestamp) -> Timestamp {
        ts.saturating_sub(self.scaled_offset(ts))
    }
}

/// Add the offset of `ctx` to a UTC timestamp.
#[must_use]
pub const fn convert_utc_to_local(ts: Timestamp, ctx: TimeContext) -> Timestamp {
    ctx.to_local(ts)
}

/// Subtract the offset of `ctx` from a local-domain timestamp.
#[must_use]
pub const fn convert_local_to_utc(ts: Timestamp, ctx: TimeContext) -> Timestamp {
    ctx.to_utc(ts)
}

/// Unit letter of a timeframe token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeframeUnit {
    /// `s`
    Second,
    /// `m`
    Minute,
    /// `h`
    Hour,
    /// `d`
    Day,
    /// `w`
    Week,
    /// `M`, an average Gregorian month.
    Month,
}

impl TimeframeUnit {
    const fn seconds(self) -> i64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::Week => 604_800,
            Self::Month => MONTH_SECONDS,
        }
    }

    const fn letter(self) -> char {
        match self {
            Self::Second => 's',
            Self::Minute => 'm',
            Self::Hour => 'h',
            Self::Day => 'd',
            Self::Week => 'w',
            Self::Month => 'M',
        }
    }

    const fn from_letter(c: char) -> Option<Self> {
        Some(match c {
            's' => Self::Second,
            'm' => Self::Minute,
            'h' => Self::Hour,
            'd' => Self::Day,
            'w' => Self::Week,
            'M' => Self::Month,
            _ => return None,
        })
    }
}

/// Duration of one candle, e.g. `1m`, `4h`, `1M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeframe {
    count: u32,
    unit: TimeframeUnit,
}

impl Timeframe {
    /// Build a timeframe from a positive multiplier and a unit.
    ///
    /// # Errors
    /// Returns `InvalidTimeframe` when `count` is zero.
    pub fn new(count: u32, unit: TimeframeUnit) -> Result<Self, SyncError> {
        if count == 0 {
            return Err(SyncError::InvalidTimeframe(format!("0{}", unit.letter())));
        }
        Ok(Self { count, unit })
    }

    /// Multiplier of the unit.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Unit letter.
    #[must_use]
    pub const fn unit(self) -> TimeframeUnit {
        self.unit
    }

    /// Length of one candle in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        (self.count as i64).saturating_mul(self.unit.seconds())
    }

    /// Length of one candle in milliseconds.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.seconds().saturating_mul(1000)
    }
}

impl FromStr for Timeframe {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SyncError::InvalidTimeframe(s.to_string());
        let unit_char = s.chars().last().ok_or_else(invalid)?;
        let unit = TimeframeUnit::from_letter(unit_char).ok_or_else(invalid)?;
        let digits = &s[..s.len() - unit_char.len_utf8()];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let count: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(count, unit).map_err(|_| invalid())
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.letter())
    }
}

/// Parse a timeframe token and return its length in seconds.
///
/// # Errors
/// Returns `InvalidTimeframe` for tokens without a leading multiplier or with
/// an unknown unit letter.
pub fn timeframe_to_seconds(tf: &str) -> Result<i64, SyncError> {
    tf.parse::<Timeframe>().map(Timeframe::seconds)
}

/// Number of candles of `tf` needed to cover `[from, to)`, rounded up.
///
/// When either bound is in milliseconds both are treated as milliseconds. An
/// inverted range yields zero or a negative count.
#[must_use]
pub fn candle_count(tf: Timeframe, from: Timestamp, to: Timestamp) -> i64 {
    let step = if is_millis(from) || is_millis(to) {
        tf.millis()
    } else {
        tf.seconds()
    };
    let span = i128::from(to) - i128::from(from);
    let step = i128::from(step);
    let q = span / step;
    let ceil = if span % step > 0 { q + 1 } else { q };
    i64::try_from(ceil).unwrap_or(if ceil > 0 { i64::MAX } else { i64::MIN })
}

/// Parse `YYYY-MM-DD` as midnight UTC, in epoch seconds.
///
/// # Errors
/// Returns `InvalidArg` when the text is not a valid date.
pub fn parse_date(s: &str) -> Result<Timestamp, SyncError> {
    let date = NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| SyncError::InvalidArg(format!("invalid date {s:?}: {e}")))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| SyncError::InvalidArg(format!("invalid date {s:?}")))
}

/// Parse `YYYY-MM-DD HH:MM:SS` as UTC, in epoch seconds.
///
/// # Errors
/// Returns `InvalidArg` when the text is not a valid date-time.
pub fn parse_datetime(s: &str) -> Result<Timestamp, SyncError> {
    NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| SyncError::InvalidArg(format!("invalid date-time {s:?}: {e}")))
}

/// Format a timestamp (either unit) as `YYYY-MM-DD HH:MM:SS`.
///
/// Out-of-range timestamps format as an empty string.
#[must_use]
pub fn format_datetime(ts: Timestamp) -> String {
    DateTime::from_timestamp(normalize_timestamp(ts), 0)
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Format a timestamp (either unit) as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(ts: Timestamp) -> String {
    DateTime::from_timestamp(normalize_timestamp(ts), 0)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
