//! chartsync-middleware
//!
//! Wrappers around a [`CandleSource`](chartsync_core::CandleSource). The
//! built-in layer is a TTL cache for the instrument catalogue; callers may add
//! their own through [`SourceBuilder::layer`].
#![warn(missing_docs)]

mod builder;
mod cache;

pub use crate::builder::SourceBuilder;
pub use crate::cache::{CacheMiddleware, CachingSource};
