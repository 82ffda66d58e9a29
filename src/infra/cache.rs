//! Read-through TTL caching for the five listing resources the client
//! serves from memory.
//!
//! There is no invalidation API: a refresh happens when the TTL is
//! exhausted (`Smart`) or when the cache is empty. Switching to
//! [`CachingMode::None`] bypasses and stops feeding the store.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

/// How fetches interact with the in-memory store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CachingMode {
    /// Never serve from cache and never store — every fetch hits the API.
    None,
    /// Serve from cache while it is non-empty and younger than the
    /// resource's TTL; refetch and overwrite otherwise.
    #[default]
    Smart,
    /// Serve any non-empty cache regardless of age; only an empty cache
    /// triggers a fetch.
    Forced,
}

/// Per-resource TTLs used in [`CachingMode::Smart`].
#[derive(Clone, Copy, Debug)]
pub struct CacheTtls {
    pub languages: Duration,
    pub currencies: Duration,
    pub port_matrix: Duration,
    pub departure_countries: Duration,
    pub best_deals_cities: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            languages: Duration::from_secs(24 * 60 * 60),
            currencies: Duration::from_secs(30 * 60),
            port_matrix: Duration::from_secs(12 * 60 * 60),
            departure_countries: Duration::from_secs(6 * 60 * 60),
            best_deals_cities: Duration::from_secs(3 * 60 * 60),
        }
    }
}

/// One resource kind's cached listing plus its last refresh time.
#[derive(Debug)]
pub(crate) struct CacheEntry<T> {
    value: Vec<T>,
    last_refresh: Option<Instant>,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            value: Vec::new(),
            last_refresh: None,
        }
    }
}

impl<T: Clone> CacheEntry<T> {
    /// Returns a copy of the cached listing if the mode and TTL allow
    /// serving it. An empty cache never hits.
    fn lookup(&self, mode: CachingMode, ttl: Duration) -> Option<Vec<T>> {
        if self.value.is_empty() {
            return None;
        }
        match mode {
            CachingMode::Forced => Some(self.value.clone()),
            CachingMode::Smart if self.is_within_ttl(ttl) => Some(self.value.clone()),
            _ => None,
        }
    }

    fn is_within_ttl(&self, ttl: Duration) -> bool {
        self.last_refresh
            .map(|at| at.elapsed() < ttl)
            .unwrap_or(false)
    }

    fn store(&mut self, value: &[T]) {
        self.value = value.to_vec();
        self.last_refresh = Some(Instant::now());
    }
}

/// The read-through transition rule, applied identically to every resource
/// kind.
///
/// The entry's lock is held across the whole check-then-act sequence, so
/// concurrent callers on one client cannot race into redundant fetches or
/// lost updates.
pub(crate) async fn get_or_refresh<T, F, Fut>(
    store: &Mutex<CacheEntry<T>>,
    resource: &'static str,
    mode: CachingMode,
    ttl: Duration,
    fetch: F,
) -> Result<Vec<T>>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut entry = store.lock().await;

    if let Some(hit) = entry.lookup(mode, ttl) {
        debug!(resource, mode = ?mode, "serving cached listing");
        return Ok(hit);
    }

    debug!(resource, mode = ?mode, "fetching listing from the API");
    let fresh = fetch().await?;

    if mode != CachingMode::None {
        entry.store(&fresh);
    }

    Ok(fresh)
}
