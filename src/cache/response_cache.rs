//! Time-boxed memoization of upstream responses.

use crate::cache::clock::{Clock, SystemClock};
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default time-to-live for both forecast and history responses.
pub const DEFAULT_TTL: TimeDelta = TimeDelta::hours(1);

/// A stored value and the moment it was produced.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.inserted_at < ttl
    }
}

type Slot<V> = Arc<Mutex<Option<CacheEntry<V>>>>;

/// Memoizes values by key for a fixed TTL.
///
/// Lookups for the same key are serialized, so concurrent callers asking for
/// a missing key wait for a single producer call instead of each fetching.
/// Different keys never wait on each other's producers. Failed producer calls
/// leave nothing behind.
#[derive(Debug)]
pub struct ResponseCache<K, V> {
    ttl: TimeDelta,
    max_entries: Option<usize>,
    clock: Arc<dyn Clock>,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> ResponseCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            max_entries: None,
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// A cache on wall-clock time with the [`DEFAULT_TTL`].
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL, Arc::new(SystemClock))
    }

    /// Bounds the number of stored keys; see [`ResponseCache::lookup_or_fetch`].
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the value stored for `key` if it is younger than the TTL,
    /// otherwise awaits `producer`, stores its value and returns it.
    ///
    /// When a bound is set and inserting exceeds it, expired entries are
    /// purged first and then the oldest entries.
    pub async fn lookup_or_fetch<F, Fut, E>(&self, key: K, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        // A slot can be dropped from the map (purge, eviction, failed fetch)
        // between cloning it and locking it. Only a slot still in the map may
        // be used, otherwise two callers could fetch the same key.
        let (slot, mut entry) = loop {
            let slot = {
                let mut slots = self.slots.lock().await;
                slots.entry(key.clone()).or_default().clone()
            };
            let entry = slot.clone().lock_owned().await;
            if self.is_current(&key, &slot).await {
                break (slot, entry);
            }
            debug!("Cache slot for {:?} was dropped while waiting, retrying", key);
        };

        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(self.clock.now(), self.ttl) {
                debug!("Cache hit for {:?}", key);
                return Ok(cached.value.clone());
            }
            debug!("Cache entry for {:?} expired", key);
        } else {
            debug!("Cache miss for {:?}", key);
        }

        let value = match producer().await {
            Ok(value) => value,
            Err(e) => {
                if entry.is_none() {
                    self.remove_slot(&key, &slot).await;
                }
                return Err(e);
            }
        };
        *entry = Some(CacheEntry {
            value: value.clone(),
            inserted_at: self.clock.now(),
        });
        drop(entry);

        if let Some(max_entries) = self.max_entries {
            self.enforce_bound(max_entries).await;
        }
        Ok(value)
    }

    /// Number of keys currently tracked, including expired ones.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every entry that is expired or holds no value.
    ///
    /// Entries with a fetch in flight are left alone.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut slots = self.slots.lock().await;
        let before = slots.len();
        slots.retain(|_, slot| match slot.try_lock() {
            Ok(entry) => entry
                .as_ref()
                .is_some_and(|cached| cached.is_fresh(now, ttl)),
            Err(_) => true,
        });
        before - slots.len()
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    async fn is_current(&self, key: &K, slot: &Slot<V>) -> bool {
        self.slots
            .lock()
            .await
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Removes `key` only if it still maps to `slot`.
    async fn remove_slot(&self, key: &K, slot: &Slot<V>) {
        let mut slots = self.slots.lock().await;
        if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(key);
        }
    }

    async fn enforce_bound(&self, max_entries: usize) {
        if self.len().await <= max_entries {
            return;
        }
        let purged = self.purge_expired().await;
        if purged > 0 {
            debug!("Purged {} expired cache entries", purged);
        }

        let mut slots = self.slots.lock().await;
        let excess = slots.len().saturating_sub(max_entries);
        if excess == 0 {
            return;
        }
        let mut by_age: Vec<(K, DateTime<Utc>)> = slots
            .iter()
            .filter_map(|(key, slot)| {
                let entry = slot.try_lock().ok()?;
                entry
                    .as_ref()
                    .map(|cached| (key.clone(), cached.inserted_at))
            })
            .collect();
        by_age.sort_by_key(|(_, inserted_at)| *inserted_at);
        for (key, _) in by_age.into_iter().take(excess) {
            debug!("Evicting cache entry for {:?}", key);
            slots.remove(&key);
        }
    }
}
