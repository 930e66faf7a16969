//! Instrument tokens inside an expression and their identifier form.

use crate::random::RANDOM_SYMBOL;

/// Distinct instrument symbols in `expression`, in order of first appearance.
///
/// A symbol is `BASE/QUOTE[:SETTLE[-EXPIRY]]` with alphanumeric parts (the
/// expiry is digits only), or the standalone word `RANDOM`. Matching is
/// case-insensitive and the returned symbols are upper-case.
#[must_use]
pub fn extract_symbols(expression: &str) -> Vec<String> {
    let text = expression.to_ascii_uppercase();
    let bytes = text.as_bytes();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let found = match_pair(bytes, i).or_else(|| match_random(bytes, i));
        match found {
            Some(end) => {
                let sym = &text[i..end];
                if !out.iter().any(|s| s == sym) {
                    out.push(sym.to_string());
                }
                i = end;
            }
            None => i += 1,
        }
    }
    out
}

/// Identifier bound to `symbol` during evaluation.
///
/// `/`, `:` and `-` become `_` and each digit gains a leading `_`, so
/// `BTC/USDT:USDT-250328` becomes `BTC_USDT_USDT__2_5_0_3_2_8`.
#[must_use]
pub fn symbol_identifier(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len() * 2);
    for c in symbol.chars() {
        match c {
            '/' | ':' | '-' => out.push('_'),
            d if d.is_ascii_digit() => {
                out.push('_');
                out.push(d);
            }
            other => out.push(other),
        }
    }
    out
}

/// Replace every symbol in `expression` with its identifier.
///
/// Longer symbols are replaced first so a symbol that is a prefix of another
/// never splits it.
pub(crate) fn substitute(expression: &str, symbols: &[String]) -> String {
    let mut ordered: Vec<&String> = symbols.iter().collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(s.len()));
    ordered.into_iter().fold(expression.to_string(), |acc, sym| {
        acc.replace(sym.as_str(), &symbol_identifier(sym))
    })
}

const fn is_alnum(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}

const fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn run_end(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| !pred(b))
        .map_or(bytes.len(), |n| start + n)
}

// BASE/QUOTE[:SETTLE[-EXPIRY]] starting exactly at `start`.
fn match_pair(bytes: &[u8], start: usize) -> Option<usize> {
    let slash = run_end(bytes, start, is_alnum);
    if slash == start || bytes.get(slash) != Some(&b'/') {
        return None;
    }
    let quote_end = run_end(bytes, slash + 1, is_alnum);
    if quote_end == slash + 1 {
        return None;
    }
    let mut end = quote_end;
    if bytes.get(end) == Some(&b':') {
        let settle_end = run_end(bytes, end + 1, is_alnum);
        if settle_end > end + 1 {
            end = settle_end;
            if bytes.get(end) == Some(&b'-') {
                let expiry_end = run_end(bytes, end + 1, |b| b.is_ascii_digit());
                if expiry_end > end + 1 {
                    end = expiry_end;
                }
            }
        }
    }
    Some(end)
}

// Standalone word RANDOM starting exactly at `start`.
fn match_random(bytes: &[u8], start: usize) -> Option<usize> {
    let end = start + RANDOM_SYMBOL.len();
    let word = bytes.get(start..end)?;
    let bounded_left = start == 0 || !is_word(bytes[start - 1]);
    let bounded_right = bytes.get(end).is_none_or(|&b| !is_word(b));
    (word == RANDOM_SYMBOL.as_bytes() && bounded_left && bounded_right).then_some(end)
}
