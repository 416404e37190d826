//! Background sweep of expired policy cache entries.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tenantgate_core::plan::{PlanCatalog, Tier};
use tenantgate_gateway::policy::PolicyCache;

fn starter() -> tenantgate_core::plan::PlanPolicy {
    PlanCatalog::standard().get(Tier::Starter).clone()
}

#[tokio::test(start_paused = true)]
async fn sweeper_purges_unread_entries() {
    let cache = Arc::new(PolicyCache::new(Duration::from_secs(30)));
    let sweeper = cache.spawn_sweeper(Duration::from_secs(60));

    cache.update("acme", starter());
    cache.update("beta", starter());
    assert_eq!(cache.len(), 2);

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(cache.is_empty());

    sweeper.abort();
}

#[tokio::test(start_paused = true)]
async fn fresh_write_after_expiry_is_readable() {
    let cache = PolicyCache::new(Duration::from_secs(30));
    cache.update("acme", starter());
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(cache.get("acme").is_none());

    cache.update("acme", starter());
    assert_eq!(cache.get("acme"), Some(starter()));
}

#[tokio::test(start_paused = true)]
async fn sweeper_exits_when_cache_dropped() {
    let cache = Arc::new(PolicyCache::new(Duration::from_secs(30)));
    let sweeper = cache.spawn_sweeper(Duration::from_secs(1));
    drop(cache);

    tokio::time::sleep(Duration::from_secs(2)).await;
    sweeper.await.expect("sweeper finished cleanly");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_and_readers() {
    let cache = Arc::new(PolicyCache::new(Duration::from_secs(60)));
    let mut tasks = Vec::new();
    for i in 0..16 {
        let cache = Arc::clone(&cache);
        tasks.push(tokio::spawn(async move {
            let tenant = format!("tenant-{}", i % 4);
            for _ in 0..100 {
                cache.update(&tenant, starter());
                assert!(cache.get(&tenant).is_some());
            }
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }
    assert_eq!(cache.len(), 4);
}

#[test]
fn purge_never_drops_live_entries_under_contention() {
    let cache = PolicyCache::new(Duration::from_secs(60));
    thread::scope(|s| {
        for w in 0..4 {
            let cache = &cache;
            s.spawn(move || {
                for i in 0..500 {
                    let tenant = format!("tenant-{}", (w + i) % 8);
                    cache.update(&tenant, starter());
                    assert_eq!(cache.get(&tenant), Some(starter()));
                }
            });
        }
        for _ in 0..2 {
            let cache = &cache;
            s.spawn(move || {
                for _ in 0..500 {
                    assert_eq!(cache.purge_expired(), 0);
                    for t in 0..8 {
                        let _ = cache.get(&format!("tenant-{t}"));
                    }
                }
            });
        }
    });
    assert_eq!(cache.len(), 8);
}

#[test]
fn expiring_entries_under_contention() {
    let cache = PolicyCache::new(Duration::from_millis(1));
    thread::scope(|s| {
        for w in 0..4 {
            let cache = &cache;
            s.spawn(move || {
                for i in 0..500 {
                    let tenant = format!("tenant-{}", (w + i) % 8);
                    cache.update(&tenant, starter());
                    // may already have expired
                    let _ = cache.get(&tenant);
                }
            });
        }
        let cache = &cache;
        s.spawn(move || {
            for _ in 0..500 {
                cache.purge_expired();
            }
        });
    });

    thread::sleep(Duration::from_millis(5));
    for t in 0..8 {
        assert!(cache.get(&format!("tenant-{t}")).is_none());
    }
    cache.purge_expired();
    assert!(cache.is_empty());
}
