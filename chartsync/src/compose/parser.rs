//! Recursive-descent parser for instrument expressions.
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/' | '//' | '%') unary)*
//! unary := ('-' | '+') unary | power
//! power := atom ('**' unary)?
//! atom  := NUMBER | IDENT | '(' expr ')'
//! ```
//!
//! `**` binds tighter than unary minus on its left and is right-associative,
//! so `-2**2` is `-(2**2)` and `2**3**2` is `2**(3**2)`.

use chartsync_core::{BinaryOp, Decimal, SyncError};

use super::lexer::{Token, TokenKind, tokenize};

/// Deepest nesting accepted before the parser gives up.
pub(crate) const MAX_DEPTH: usize = 64;

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    Number(Decimal),
    Ident(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Parse `src` into an expression tree.
pub(crate) fn parse(src: &str) -> Result<Expr, SyncError> {
    let tokens = tokenize(src)?;
    let mut p = Parser {
        tokens,
        idx: 0,
        depth: 0,
        end: src.len(),
    };
    let expr = p.expr()?;
    match p.peek() {
        None => Ok(expr),
        Some(t) => Err(SyncError::syntax(
            t.pos,
            format!("unexpected {}", t.kind.describe()),
        )),
    }
}

struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    depth: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.idx)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.idx).cloned();
        if t.is_some() {
            self.idx += 1;
        }
        t
    }

    fn pos(&self) -> usize {
        self.peek().map_or(self.end, |t| t.pos)
    }

    fn enter(&mut self) -> Result<(), SyncError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyncError::syntax(self.pos(), "expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, SyncError> {
        self.enter()?;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.idx += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth -= 1;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, SyncError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::DoubleSlash) => BinaryOp::FloorDiv,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.idx += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, SyncError> {
        match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.idx += 1;
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(TokenKind::Plus) => {
                self.idx += 1;
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, SyncError> {
        let base = self.atom()?;
        if self.peek_kind() == Some(&TokenKind::DoubleStar) {
            self.idx += 1;
            self.enter()?;
            let exp = self.unary()?;
            self.depth -= 1;
            return Ok(binary(BinaryOp::Pow, base, exp));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, SyncError> {
        let pos = self.pos();
        match self.next() {
            Some(Token {
                kind: TokenKind::Number(n),
                ..
            }) => Ok(Expr::Number(n)),
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => {
                if self.peek_kind() == Some(&TokenKind::LParen) {
                    return Err(SyncError::syntax(
                        self.pos(),
                        format!("calls are not allowed ({name})"),
                    ));
                }
                Ok(Expr::Ident(name))
            }
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(t) => Err(SyncError::syntax(
                        t.pos,
                        format!("expected ')', found {}", t.kind.describe()),
                    )),
                    None => Err(SyncError::syntax(self.end, "missing ')'")),
                }
            }
            Some(t) => Err(SyncError::syntax(
                t.pos,
                format!("unexpected {}", t.kind.describe()),
            )),
            None => Err(SyncError::syntax(pos, "unexpected end of expression")),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
