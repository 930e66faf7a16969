use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the chartsync workspace.
///
/// This covers source-side failures (network, rate limiting), argument
/// validation, data problems, and expression composition failures.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyncError {
    /// The requested capability is not implemented by the target source.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "symbols").
        capability: String,
    },

    /// The source could not be reached (connection reset, DNS, TLS, ...).
    #[error("network failure: {0}")]
    Network(String),

    /// No candle source is attached to the orchestrator.
    #[error("there is no connection")]
    NotConnected,

    /// Issues with the returned or expected data (missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A timeframe token that does not parse (e.g. "5x", "m").
    #[error("invalid timeframe: {0:?}")]
    InvalidTimeframe(String),

    /// An individual source returned an error.
    #[error("{source_name} failed: {error}")]
    Source {
        /// Source name that failed.
        source_name: String,
        /// The underlying error reported by the source.
        error: Box<SyncError>,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),

    /// The expression text could not be parsed.
    #[error("expression syntax error at byte {position}: {message}")]
    Syntax {
        /// Byte offset into the rewritten expression.
        position: usize,
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// The expression referenced a name that is not bound to a synced series.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// The expression evaluated to a bare number instead of a candle series.
    #[error("expression does not reference any series")]
    NotASeries,

    /// The request rate exceeds the upstream rate limit.
    #[error("rate limit exceeded: limit={limit} window_ms={window_ms}")]
    RateLimitExceeded {
        /// Allowed number of requests in the window.
        limit: u64,
        /// Window length in milliseconds.
        window_ms: u64,
    },
}

impl SyncError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Network` error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Helper: tag an error with the name of the source that produced it.
    ///
    /// Errors that are already tagged are returned unchanged.
    pub fn source(source_name: impl Into<String>, error: Self) -> Self {
        match error {
            e @ Self::Source { .. } => e,
            other => Self::Source {
                source_name: source_name.into(),
                error: Box::new(other),
            },
        }
    }

    /// Helper: build a `Syntax` error at a byte position.
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Returns true for failures that may clear up on their own: network
    /// problems and upstream rate limiting.
    ///
    /// These are the failures that warrant a connection-recovery attempt by
    /// the caller. Source-tagged errors are classified by their inner error.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimitExceeded { .. } => true,
            Self::Source { error, .. } => error.is_transient(),
            _ => false,
        }
    }

    /// Returns true when the error originates from the expression itself rather
    /// than from a source.
    #[must_use]
    pub const fn is_composition(&self) -> bool {
        matches!(
            self,
            Self::Syntax { .. } | Self::UnknownIdentifier(_) | Self::NotASeries
        )
    }

    /// Strip any source tagging and return the innermost error.
    #[must_use]
    pub fn into_inner(self) -> Self {
        match self {
            Self::Source { error, .. } => error.into_inner(),
            other => other,
        }
    }
}
