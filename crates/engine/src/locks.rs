//! Per-location advisory locks.
//!
//! The remote system is authoritative and may be changed out-of-band, so
//! overlapping attempts for one location are not unsafe, merely wasteful
//! and prone to a flapping bind target. Attempts for the same location are
//! serialized here; attempts for different locations never block each
//! other (this deliberately replaces any process-wide "sync in progress"
//! flag).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use adscreen_core::types::DbId;

/// Registry of one async mutex per location, created lazily.
#[derive(Default)]
pub struct LocationLocks {
    inner: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl LocationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, location_id: DbId) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().await;
        Arc::clone(map.entry(location_id).or_default())
    }

    /// Wait for the location's lock. Used by operator-triggered attempts,
    /// which should queue rather than fail.
    pub async fn acquire(&self, location_id: DbId) -> OwnedMutexGuard<()> {
        self.entry(location_id).await.lock_owned().await
    }

    /// Take the lock only if it is free. Used by the sweep so a slow
    /// attempt never stacks up followers.
    pub async fn try_acquire(&self, location_id: DbId) -> Option<OwnedMutexGuard<()>> {
        self.entry(location_id).await.try_lock_owned().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_location_is_exclusive() {
        let locks = LocationLocks::new();
        let guard = locks.acquire(1).await;
        assert!(locks.try_acquire(1).await.is_none());
        drop(guard);
        assert!(locks.try_acquire(1).await.is_some());
    }

    #[tokio::test]
    async fn different_locations_are_independent() {
        let locks = LocationLocks::new();
        let _one = locks.acquire(1).await;
        assert!(locks.try_acquire(2).await.is_some());
    }

    #[tokio::test]
    async fn acquire_waits_for_release() {
        let locks = Arc::new(LocationLocks::new());
        let guard = locks.acquire(7).await;

        let locks_clone = Arc::clone(&locks);
        let waiter = tokio::spawn(async move {
            let _guard = locks_clone.acquire(7).await;
        });

        // Give the waiter a chance to park on the lock, then release.
        tokio::task::yield_now().await;
        drop(guard);
        waiter.await.unwrap();
    }
}
