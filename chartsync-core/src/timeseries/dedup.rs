use crate::types::Candle;

/// Keep only rows whose timestamp strictly exceeds the previously kept row.
///
/// Overlapping pages from a source repeat their boundary rows; the first
/// occurrence wins. A row that goes backwards in time is dropped as well, so
/// the output is always strictly ascending.
#[must_use]
pub fn dedup_strictly_ascending<I>(rows: I) -> Vec<Candle>
where
    I: IntoIterator<Item = Candle>,
{
    let mut out: Vec<Candle> = Vec::new();
    for row in rows {
        if out.last().is_none_or(|prev| prev.ts < row.ts) {
            out.push(row);
        }
    }
    out
}

/// True when every timestamp is strictly greater than the one before it.
#[must_use]
pub fn is_strictly_ascending(rows: &[Candle]) -> bool {
    rows.windows(2).all(|w| w[0].ts < w[1].ts)
}
