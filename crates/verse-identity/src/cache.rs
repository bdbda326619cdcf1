//! Identity-keyed lazy cache
//!
//! Provides [`IdentityCache`], a map from [`Identity`] to lazily created values
//! with at-most-once creation per key.
//!
//! # Creation protocol
//!
//! Each key owns a slot that moves `Vacant -> Creating -> Ready`. Exactly one
//! caller claims a vacant slot and runs the factory without holding any lock,
//! so the factory may itself look up *other* keys. Concurrent callers for the
//! same key block until the value is ready. A factory that looks up its own
//! key on the same thread gets [`CacheError::CyclicCreation`].
//!
//! A failed (or panicking) factory retires the slot: nothing is installed and
//! the next caller runs its own factory.
//!
//! Lock order is always slot, then map shard. The shard lock is released
//! before any slot is locked on the lookup path.

use crate::error::{CacheError, CacheResult};
use crate::identity::{Identified, Identity};
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of installed entries
    pub entry_count: u64,
    /// Lookups answered from an existing entry
    pub hits: u64,
    /// Lookups that created a new entry
    pub misses: u64,
    /// Factories that failed or panicked
    pub failed_creations: u64,
}

enum SlotState<V> {
    Vacant,
    Creating(ThreadId),
    Ready(V),
    /// Removed from the map; holders must fetch a fresh slot
    Retired,
}

struct Slot<V> {
    state: Mutex<SlotState<V>>,
    ready: Condvar,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Vacant),
            ready: Condvar::new(),
        }
    }
}

/// What a caller does after inspecting a slot
enum Step<V> {
    Hit(V),
    Cycle,
    Wait,
    Refetch,
    Claim,
}

#[derive(Default)]
struct Counters {
    entries: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

/// Lazy cache keyed by object identity
///
/// Values are held strongly. Keys are plain [`Identity`] tokens, so the cache
/// never keeps an original object alive by itself.
///
/// # Example
/// ```
/// use verse_identity::{IdentityCache, Obj};
///
/// let cache = IdentityCache::new();
/// let key = Obj::new("original");
///
/// let first = cache.get_or_insert_with(&key, || 42).unwrap();
/// let second = cache.get_or_insert_with(&key, || unreachable!()).unwrap();
/// assert_eq!(first, second);
/// ```
pub struct IdentityCache<V> {
    slots: DashMap<Identity, Arc<Slot<V>>>,
    counters: Counters,
}

impl<V: Clone> IdentityCache<V> {
    /// Create empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Create empty cache with room for `capacity` keys
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: DashMap::with_capacity(capacity),
            counters: Counters::default(),
        }
    }

    /// Get the value for `key`, creating it with `factory` on first access
    ///
    /// # Errors
    /// Returns [`CacheError::CyclicCreation`] if `factory` for this key is
    /// already running on the current thread.
    pub fn get_or_insert_with<F>(&self, key: &impl Identified, factory: F) -> CacheResult<V>
    where
        F: FnOnce() -> V,
    {
        self.get_or_try_insert_with(key, || Ok::<V, CacheError>(factory()))
    }

    /// Get the value for `key`, creating it with a fallible `factory`
    ///
    /// The factory runs at most once per successful creation. If it fails the
    /// error is returned and no entry is installed.
    ///
    /// # Errors
    /// Returns the factory's error, or [`CacheError::CyclicCreation`]
    /// (converted into `E`) on same-thread re-entry for the same key.
    pub fn get_or_try_insert_with<E, F>(&self, key: &impl Identified, factory: F) -> Result<V, E>
    where
        E: From<CacheError>,
        F: FnOnce() -> Result<V, E>,
    {
        let key = key.identity();
        let me = thread::current().id();

        loop {
            let slot = self.slot(key);
            let mut state = slot.state.lock();

            loop {
                let step = match &*state {
                    SlotState::Ready(value) => Step::Hit(value.clone()),
                    SlotState::Creating(owner) if *owner == me => Step::Cycle,
                    SlotState::Creating(_) => Step::Wait,
                    SlotState::Retired => Step::Refetch,
                    SlotState::Vacant => Step::Claim,
                };

                match step {
                    Step::Hit(value) => {
                        self.counters.hits.fetch_add(1, Ordering::Relaxed);
                        tracing::trace!(%key, "cache hit");
                        return Ok(value);
                    }
                    Step::Cycle => {
                        tracing::warn!(%key, "cyclic creation rejected");
                        return Err(CacheError::CyclicCreation { key }.into());
                    }
                    Step::Wait => slot.ready.wait(&mut state),
                    Step::Refetch => break,
                    Step::Claim => {
                        *state = SlotState::Creating(me);
                        drop(state);

                        let claim = Claim {
                            cache: self,
                            key,
                            slot: &slot,
                            armed: true,
                        };
                        return claim.complete(factory());
                    }
                }
            }
        }
    }

    /// Get the value for `key` without creating it
    #[must_use]
    pub fn get(&self, key: &impl Identified) -> Option<V> {
        let slot = self.slots.get(&key.identity())?.value().clone();
        let state = slot.state.lock();
        match &*state {
            SlotState::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Check if a value is installed for `key`
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &impl Identified) -> bool {
        self.get(key).is_some()
    }

    /// Remove installed entries for which `keep` returns `false`
    ///
    /// Entries still being created are never removed. `keep` runs with no
    /// lock held, so it may look up this cache. Returns the number of entries
    /// removed.
    pub fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(Identity, &V) -> bool,
    {
        let snapshot: Vec<(Identity, Arc<Slot<V>>)> = self
            .slots
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut removed = 0;
        for (key, slot) in snapshot {
            let value = match &*slot.state.lock() {
                SlotState::Ready(value) => value.clone(),
                _ => continue,
            };
            if keep(key, &value) {
                continue;
            }

            // Ready is final until retired, so a slot still Ready holds `value`
            let mut state = slot.state.lock();
            if matches!(&*state, SlotState::Ready(_)) {
                *state = SlotState::Retired;
                self.slots.remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));
                self.counters.entries.fetch_sub(1, Ordering::Relaxed);
                slot.ready.notify_all();
                removed += 1;
            }
        }
        removed
    }

    /// Number of installed entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.counters.entries.load(Ordering::Relaxed)).unwrap_or(usize::MAX)
    }

    /// Check if no entry is installed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.counters.entries.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            failed_creations: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    /// Fetch or insert the slot for `key`, releasing the shard lock
    fn slot(&self, key: Identity) -> Arc<Slot<V>> {
        Arc::clone(
            self.slots
                .entry(key)
                .or_insert_with(|| Arc::new(Slot::new()))
                .value(),
        )
    }

    /// Mark a claimed slot as retired and drop it from the map
    fn retire(&self, key: Identity, slot: &Arc<Slot<V>>) {
        let mut state = slot.state.lock();
        *state = SlotState::Retired;
        self.slots.remove_if(&key, |_, current| Arc::ptr_eq(current, slot));
        self.counters.failures.fetch_add(1, Ordering::Relaxed);
        slot.ready.notify_all();
    }
}

impl<V: Clone> Default for IdentityCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Debug for IdentityCache<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Ownership of a slot in the `Creating` state
///
/// Retires the slot on drop unless a value was installed, so a panicking
/// factory releases waiters instead of stranding them.
struct Claim<'a, V: Clone> {
    cache: &'a IdentityCache<V>,
    key: Identity,
    slot: &'a Arc<Slot<V>>,
    armed: bool,
}

impl<V: Clone> Claim<'_, V> {
    fn complete<E>(mut self, outcome: Result<V, E>) -> Result<V, E> {
        let value = match outcome {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(key = %self.key, "factory failed; slot retired");
                return Err(err);
            }
        };

        let mut state = self.slot.state.lock();
        *state = SlotState::Ready(value.clone());
        self.armed = false;
        self.cache.counters.entries.fetch_add(1, Ordering::Relaxed);
        self.cache.counters.misses.fetch_add(1, Ordering::Relaxed);
        self.slot.ready.notify_all();
        drop(state);

        tracing::trace!(key = %self.key, "cache entry installed");
        Ok(value)
    }
}

impl<V: Clone> Drop for Claim<'_, V> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.retire(self.key, self.slot);
        }
    }
}
