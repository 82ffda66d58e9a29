//! HTTP client and caching infrastructure.

pub mod cache;
pub mod pegasus;

pub use cache::{CacheTtls, CachingMode};
pub use pegasus::{PegasusClient, PegasusClientBuilder};
