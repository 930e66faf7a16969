use chartsync_core::{Decimal, SyncError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Number(Decimal),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Ident(name) => format!("identifier {name}"),
            Self::Plus => "'+'".into(),
            Self::Minus => "'-'".into(),
            Self::Star => "'*'".into(),
            Self::DoubleStar => "'**'".into(),
            Self::Slash => "'/'".into(),
            Self::DoubleSlash => "'//'".into(),
            Self::Percent => "'%'".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// Byte offset of the token in the expression.
    pub(crate) pos: usize,
}

/// Split an arithmetic expression into tokens.
///
/// Only numbers, identifiers, the operators `+ - * ** / // %` and parentheses
/// are recognized; any other character is a syntax error.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, SyncError> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let start = i;
        let kind = match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'+' => {
                i += 1;
                TokenKind::Plus
            }
            b'-' => {
                i += 1;
                TokenKind::Minus
            }
            b'%' => {
                i += 1;
                TokenKind::Percent
            }
            b'(' => {
                i += 1;
                TokenKind::LParen
            }
            b')' => {
                i += 1;
                TokenKind::RParen
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                TokenKind::DoubleStar
            }
            b'*' => {
                i += 1;
                TokenKind::Star
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i += 2;
                TokenKind::DoubleSlash
            }
            b'/' => {
                i += 1;
                TokenKind::Slash
            }
            b'0'..=b'9' | b'.' => {
                let (n, end) = number(src, i)?;
                i = end;
                TokenKind::Number(n)
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let end = bytes[i..]
                    .iter()
                    .position(|c| !(c.is_ascii_alphanumeric() || *c == b'_'))
                    .map_or(bytes.len(), |n| i + n);
                let name = src[i..end].to_string();
                i = end;
                TokenKind::Ident(name)
            }
            _ => {
                let ch = src[i..].chars().next().unwrap_or('?');
                return Err(SyncError::syntax(i, format!("unexpected character '{ch}'")));
            }
        };
        out.push(Token { kind, pos: start });
    }
    Ok(out)
}

fn digits_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(bytes.len(), |n| from + n)
}

// digits [. digits] [E [+-] digits], or . digits [...]
fn number(src: &str, start: usize) -> Result<(Decimal, usize), SyncError> {
    let bytes = src.as_bytes();
    let int_end = digits_end(bytes, start);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        end = digits_end(bytes, end + 1);
    }
    if end == start + 1 && bytes[start] == b'.' {
        return Err(SyncError::syntax(start, "unexpected character '.'"));
    }
    let mut scientific = false;
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_end(bytes, exp);
        if exp_end == exp {
            return Err(SyncError::syntax(end, "malformed exponent"));
        }
        end = exp_end;
        scientific = true;
    }

    let text = src[start..end].to_ascii_lowercase();
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), ""));
    let mantissa = mantissa.trim_end_matches('.');
    let mantissa = if mantissa.starts_with('.') {
        format!("0{mantissa}")
    } else {
        mantissa.to_string()
    };
    let parsed = if scientific {
        Decimal::from_scientific(&format!("{mantissa}e{exponent}"))
    } else {
        mantissa.parse::<Decimal>()
    };
    parsed
        .map(|n| (n, end))
        .map_err(|_| SyncError::syntax(start, "number out of range"))
}
