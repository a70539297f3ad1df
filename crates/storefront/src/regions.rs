//! Process-wide region cache.
//!
//! Maps every country code served by the backend to its [`Region`]. The map
//! is fetched wholesale, held as an immutable [`RegionSnapshot`], and swapped
//! in one step on refresh so readers never observe a partially built map.
//!
//! A snapshot is stale once it is more than [`REGION_CACHE_TTL_SECS`] old.
//! Stale or empty caches are refreshed synchronously before use. A failed
//! refresh keeps the previous snapshot, so a backend outage degrades to the
//! last known region map instead of failing every request.
//!
//! Concurrent requests that all find the cache stale may each refetch. The
//! rebuild is a whole-snapshot replacement, so redundant refreshes are
//! harmless.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use meridian_core::{CountryCode, Region};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::commerce::{CommerceClient, CommerceError};

/// Maximum snapshot age before a refetch is required (one hour).
pub const REGION_CACHE_TTL_SECS: i64 = 60 * 60;

// =============================================================================
// RegionSnapshot
// =============================================================================

/// One generation of the region map.
#[derive(Debug, Clone)]
pub struct RegionSnapshot {
    by_country: IndexMap<CountryCode, Arc<Region>>,
    refreshed_at: DateTime<Utc>,
}

impl RegionSnapshot {
    /// Build a snapshot from the backend's region list.
    ///
    /// Countries are inserted in backend order. When two regions claim the
    /// same country the later region wins, but the country keeps the
    /// position of its first appearance.
    #[must_use]
    pub fn from_regions(regions: Vec<Region>, refreshed_at: DateTime<Utc>) -> Self {
        let mut by_country = IndexMap::new();
        for region in regions {
            let region = Arc::new(region);
            for country in &region.countries {
                by_country.insert(country.clone(), Arc::clone(&region));
            }
        }

        Self {
            by_country,
            refreshed_at,
        }
    }

    /// Look up the region serving `country`.
    #[must_use]
    pub fn get(&self, country: &CountryCode) -> Option<&Region> {
        self.by_country.get(country).map(AsRef::as_ref)
    }

    /// Resolve a raw signal (URL segment, header value) to a cached key.
    ///
    /// The input is lowercased before lookup; anything that is not a valid
    /// two-letter code is simply absent.
    #[must_use]
    pub fn lookup(&self, raw: &str) -> Option<&CountryCode> {
        let code = CountryCode::parse(raw.trim()).ok()?;
        self.by_country.get_key_value(&code).map(|(key, _)| key)
    }

    /// Returns true if `country` is a key in this snapshot.
    #[must_use]
    pub fn contains(&self, country: &CountryCode) -> bool {
        self.by_country.contains_key(country)
    }

    /// First country in insertion order.
    ///
    /// This follows the backend's region ordering and is only stable within
    /// a single snapshot.
    #[must_use]
    pub fn first_country(&self) -> Option<&CountryCode> {
        self.by_country.keys().next()
    }

    /// All cached country codes, in insertion order.
    pub fn countries(&self) -> impl Iterator<Item = &CountryCode> {
        self.by_country.keys()
    }

    /// Distinct regions, in order of first appearance.
    #[must_use]
    pub fn regions(&self) -> Vec<&Region> {
        let mut seen: Vec<&Region> = Vec::new();
        for region in self.by_country.values() {
            if !seen.iter().any(|r| r.id == region.id) {
                seen.push(region);
            }
        }
        seen
    }

    /// Number of cached countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_country.len()
    }

    /// Returns true if no country is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_country.is_empty()
    }

    /// When this snapshot was fetched.
    #[must_use]
    pub const fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// Returns true if the snapshot is older than the TTL at `now`.
    #[must_use]
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        now - self.refreshed_at > TimeDelta::seconds(REGION_CACHE_TTL_SECS)
    }
}

// =============================================================================
// RegionCache
// =============================================================================

/// Shared, lazily refreshed region map.
///
/// Cheaply cloneable; all clones share the same snapshot.
#[derive(Clone)]
pub struct RegionCache {
    inner: Arc<RegionCacheInner>,
}

struct RegionCacheInner {
    client: CommerceClient,
    snapshot: RwLock<Option<Arc<RegionSnapshot>>>,
    /// Set by `invalidate`, cleared by the next successful refresh.
    force_refresh: AtomicBool,
}

impl RegionCache {
    /// Create an empty cache backed by `client`.
    #[must_use]
    pub fn new(client: CommerceClient) -> Self {
        Self {
            inner: Arc::new(RegionCacheInner {
                client,
                snapshot: RwLock::new(None),
                force_refresh: AtomicBool::new(false),
            }),
        }
    }

    /// Create a cache pre-populated with `snapshot`.
    #[must_use]
    pub fn with_snapshot(client: CommerceClient, snapshot: RegionSnapshot) -> Self {
        Self {
            inner: Arc::new(RegionCacheInner {
                client,
                snapshot: RwLock::new(Some(Arc::new(snapshot))),
                force_refresh: AtomicBool::new(false),
            }),
        }
    }

    /// Current snapshot without triggering a refresh.
    pub async fn current(&self) -> Option<Arc<RegionSnapshot>> {
        self.inner.snapshot.read().await.clone()
    }

    /// Return a fresh snapshot, refetching first if the cache is empty or stale.
    ///
    /// # Errors
    ///
    /// Returns the refresh error only when there is no previous snapshot to
    /// fall back to.
    pub async fn get(&self, cache_id: &str) -> Result<Arc<RegionSnapshot>, CommerceError> {
        self.get_at(cache_id, Utc::now()).await
    }

    /// [`get`](Self::get) evaluated at an explicit point in time.
    ///
    /// # Errors
    ///
    /// Returns the refresh error only when there is no previous snapshot to
    /// fall back to.
    pub async fn get_at(
        &self,
        cache_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Arc<RegionSnapshot>, CommerceError> {
        let current = self.current().await;

        if let Some(snapshot) = &current
            && !snapshot.is_empty()
            && !snapshot.is_stale_at(now)
            && !self.inner.force_refresh.load(Ordering::Acquire)
        {
            return Ok(Arc::clone(snapshot));
        }

        match self.refresh_at(cache_id, now).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => match current {
                Some(stale) if !stale.is_empty() => {
                    tracing::warn!(
                        error = %e,
                        refreshed_at = %stale.refreshed_at(),
                        "Region refresh failed, serving previous region map"
                    );
                    Ok(stale)
                }
                _ => Err(e),
            },
        }
    }

    /// Fetch regions now and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the previous snapshot is left untouched.
    pub async fn refresh(&self, cache_id: &str) -> Result<Arc<RegionSnapshot>, CommerceError> {
        self.refresh_at(cache_id, Utc::now()).await
    }

    #[instrument(skip(self, now))]
    async fn refresh_at(
        &self,
        cache_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Arc<RegionSnapshot>, CommerceError> {
        let regions = self.inner.client.list_regions(cache_id).await?;
        let snapshot = Arc::new(RegionSnapshot::from_regions(regions, now));

        *self.inner.snapshot.write().await = Some(Arc::clone(&snapshot));
        self.inner.force_refresh.store(false, Ordering::Release);

        tracing::info!(countries = snapshot.len(), "Region map refreshed");
        Ok(snapshot)
    }

    /// Force the next [`get`](Self::get) to refetch.
    ///
    /// The current map and its timestamp are kept as the fallback for a
    /// failed refetch.
    pub fn invalidate(&self) {
        self.inner.force_refresh.store(true, Ordering::Release);
    }
}
