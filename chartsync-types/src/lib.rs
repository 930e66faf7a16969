//! Error and configuration primitives shared across the chartsync crates.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;
mod price_type;

pub use capability::Capability;
pub use config::{CacheConfig, RandomWalkConfig, SyncConfig};
pub use error::SyncError;
pub use price_type::PriceType;
