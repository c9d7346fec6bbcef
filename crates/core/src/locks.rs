//! Per-key async lock registry.
//!
//! Replaces process-wide "in progress" flags: every (tenant, asset) and
//! every (tenant, source event) gets its own mutex, created on first use
//! and dropped from the registry when its last guard is released.

use std::hash::Hash;
use std::sync::Arc;

use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Registry<K> = DashMap<K, Arc<Mutex<()>>>;

/// Registry of async mutexes keyed by `K`.
#[derive(Debug)]
pub struct KeyedLocks<K: Eq + Hash> {
    locks: Arc<Registry<K>>,
}

impl<K: Eq + Hash> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }
}

/// Held lock of one key.
///
/// Dropping the last guard of a key (with nobody waiting) removes the key
/// from the registry.
#[derive(Debug)]
pub struct KeyedGuard<K: Eq + Hash> {
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
    registry: Arc<Registry<K>>,
}

impl<K: Eq + Hash> Drop for KeyedGuard<K> {
    fn drop(&mut self) {
        // Release the mutex first so its own reference no longer counts.
        self.guard.take();
        self.registry
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl<K: Eq + Hash + Clone + Ord> KeyedLocks<K> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex_for(&self, key: K) -> Arc<Mutex<()>> {
        self.locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Waits for the lock of `key`.
    pub async fn lock(&self, key: K) -> KeyedGuard<K> {
        let guard = self.mutex_for(key.clone()).lock_owned().await;
        KeyedGuard {
            key,
            guard: Some(guard),
            registry: Arc::clone(&self.locks),
        }
    }

    /// Waits for the locks of several keys.
    ///
    /// Keys are deduplicated and acquired in ascending order, so two callers
    /// locking overlapping sets cannot deadlock.
    pub async fn lock_many(&self, keys: impl IntoIterator<Item = K>) -> Vec<KeyedGuard<K>> {
        let mut keys: Vec<K> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.lock(key).await);
        }
        guards
    }

    /// Number of keys currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no key is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Lock key of a (tenant, asset) lot book.
pub type AssetKey = (TenantId, AssetSymbol);

/// Lock key of an idempotency slot.
pub type SourceKey = (TenantId, SourceEventId);

/// The lock registries shared by every engine service.
#[derive(Debug, Default)]
pub struct LedgerLocks {
    /// Serializes lot mutation per (tenant, asset).
    pub assets: KeyedLocks<AssetKey>,
    /// Serializes generation per (tenant, source event).
    pub sources: KeyedLocks<SourceKey>,
}

impl LedgerLocks {
    /// Creates empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::<u32>::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let active = Arc::clone(&active);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock(7).await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyedLocks::<u32>::new();
        let _a = locks.lock(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_lock_many_dedups() {
        let locks = KeyedLocks::<u32>::new();
        let guards = locks.lock_many([3, 1, 3, 2]).await;
        assert_eq!(guards.len(), 3);
        assert_eq!(locks.len(), 3);
    }

    #[tokio::test]
    async fn test_released_keys_leave_the_registry() {
        let locks = KeyedLocks::<u32>::new();
        let held = locks.lock(1).await;
        drop(locks.lock(2).await);
        assert_eq!(locks.len(), 1);

        drop(held);
        assert!(locks.is_empty());

        drop(locks.lock_many([4, 5, 6]).await);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_waiter_keeps_key_registered() {
        let locks = Arc::new(KeyedLocks::<u32>::new());
        let held = locks.lock(9).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(9).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(held);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
