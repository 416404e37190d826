//! Tenant policy cache with passive expiry.
//!
//! Entries live for a fixed TTL from their last write. Reads past the TTL see
//! a miss and drop the entry; `spawn_sweeper` reclaims entries nobody reads.
//! All methods take `&self` and are safe to call from any task; `DashMap`
//! shards the locking, so no caller-side synchronization is needed.
//!
//! Time comes from `tokio::time::Instant` so tests can drive expiry with a
//! paused clock.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use tenantgate_core::plan::PlanPolicy;

#[derive(Debug, Clone)]
struct CacheEntry {
    policy: PlanPolicy,
    expires_at: Instant,
}

/// Tenant name -> resolved plan policy.
#[derive(Debug)]
pub struct PolicyCache {
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
}

impl PolicyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert or overwrite the entry for `tenant` with a fresh TTL.
    pub fn update(&self, tenant: &str, policy: PlanPolicy) {
        let expires_at = Instant::now() + self.ttl;
        self.entries
            .insert(tenant.to_string(), CacheEntry { policy, expires_at });
    }

    /// Cached policy for `tenant`, or `None` if absent or expired.
    pub fn get(&self, tenant: &str) -> Option<PlanPolicy> {
        let now = Instant::now();
        match self.entries.get(tenant) {
            Some(e) if e.expires_at > now => return Some(e.policy.clone()),
            Some(_) => {}
            None => return None,
        }
        // a concurrent update may have refreshed it since the read
        self.entries.remove_if(tenant, |_, e| e.expires_at <= now);
        None
    }

    pub fn invalidate(&self, tenant: &str) {
        self.entries.remove(tenant);
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut purged = 0;
        self.entries.retain(|_, e| {
            let keep = e.expires_at > now;
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    /// Entries currently stored, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Purge expired entries every `every` until the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut tick = time::interval(every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            tick.tick().await;
            loop {
                tick.tick().await;
                let Some(cache) = cache.upgrade() else {
                    tracing::debug!("policy cache dropped; sweeper exiting");
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, remaining = cache.len(), "policy cache sweep");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantgate_core::plan::{PlanCatalog, Tier};

    fn free() -> PlanPolicy {
        PlanCatalog::standard().get(Tier::Free).clone()
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let cache = PolicyCache::new(Duration::from_secs(60));
        cache.update("acme", free());
        assert_eq!(cache.get("acme"), Some(free()));

        time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("acme").is_some());

        time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("acme").is_none());
        // passive expiry removed it
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_resets_ttl() {
        let cache = PolicyCache::new(Duration::from_secs(10));
        cache.update("acme", free());
        time::advance(Duration::from_secs(8)).await;
        cache.update("acme", free());
        time::advance(Duration::from_secs(8)).await;
        assert!(cache.get("acme").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn purge_counts_only_expired() {
        let cache = PolicyCache::new(Duration::from_secs(10));
        cache.update("old", free());
        time::advance(Duration::from_secs(5)).await;
        cache.update("new", free());
        time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn invalidate_is_immediate() {
        let cache = PolicyCache::new(Duration::from_secs(60));
        cache.update("acme", free());
        cache.invalidate("acme");
        assert!(cache.get("acme").is_none());
    }
}
