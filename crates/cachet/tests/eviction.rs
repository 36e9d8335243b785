// Copyright (c) Microsoft Corporation.

//! Integration tests for capacity enforcement and the eviction policies.

use std::time::Duration;

use cachet::eviction::{Fifo, Filo, Lfu, Mfu, Mru};
use cachet::expiry::CreatedExpiry;
use cachet::sampler::RandomSampler;
use cachet::{Cache, Clock, ClockControl};

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

/// Eviction policies rank by timestamps, so tests advance the clock a
/// microsecond between operations to keep orderings unambiguous.
fn tick(control: &ClockControl) {
    control.advance(Duration::from_micros(1));
}

#[test]
fn fifo_evicts_the_oldest_entry() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .eviction(Fifo)
            .max_entries(2)
            .build();

        cache.put(&"k1".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"k2".to_string(), 2).await.unwrap();
        tick(&control);
        cache.put(&"k3".to_string(), 3).await.unwrap();

        assert_eq!(cache.len().await.unwrap(), 2);
        assert!(!cache.contains_key(&"k1".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k2".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k3".to_string()).await.unwrap());
    });
}

#[test]
fn filo_evicts_the_newest_entry() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .eviction(Filo)
            .max_entries(2)
            .build();

        cache.put(&"k1".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"k2".to_string(), 2).await.unwrap();
        tick(&control);
        cache.put(&"k3".to_string(), 3).await.unwrap();

        // k2 was the newest stored entry when room had to be made.
        assert!(cache.contains_key(&"k1".to_string()).await.unwrap());
        assert!(!cache.contains_key(&"k2".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k3".to_string()).await.unwrap());
    });
}

#[test]
fn lru_evicts_the_stalest_entry() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .max_entries(3)
            .build();

        cache.put(&"k1".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"k2".to_string(), 2).await.unwrap();
        tick(&control);
        cache.put(&"k3".to_string(), 3).await.unwrap();
        tick(&control);
        cache.get(&"k1".to_string()).await.unwrap();
        tick(&control);
        cache.get(&"k3".to_string()).await.unwrap();
        tick(&control);
        cache.put(&"k4".to_string(), 4).await.unwrap();

        assert!(!cache.contains_key(&"k2".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k1".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k3".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k4".to_string()).await.unwrap());
    });
}

#[test]
fn mru_evicts_the_freshest_entry() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .eviction(Mru)
            .max_entries(3)
            .build();

        cache.put(&"k1".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"k2".to_string(), 2).await.unwrap();
        tick(&control);
        cache.put(&"k3".to_string(), 3).await.unwrap();
        tick(&control);
        cache.get(&"k1".to_string()).await.unwrap();
        tick(&control);
        cache.get(&"k3".to_string()).await.unwrap();
        tick(&control);
        cache.put(&"k4".to_string(), 4).await.unwrap();

        assert!(!cache.contains_key(&"k3".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k1".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k2".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k4".to_string()).await.unwrap());
    });
}

#[test]
fn lfu_evicts_the_least_read_entry() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .eviction(Lfu)
            .max_entries(3)
            .build();

        cache.put(&"k1".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"k2".to_string(), 2).await.unwrap();
        tick(&control);
        cache.put(&"k3".to_string(), 3).await.unwrap();
        tick(&control);
        for _ in 0..3 {
            cache.get(&"k1".to_string()).await.unwrap();
            tick(&control);
        }
        cache.get(&"k2".to_string()).await.unwrap();
        tick(&control);
        for _ in 0..2 {
            cache.get(&"k3".to_string()).await.unwrap();
            tick(&control);
        }
        cache.put(&"k4".to_string(), 4).await.unwrap();

        assert!(!cache.contains_key(&"k2".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k1".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k3".to_string()).await.unwrap());
        assert!(cache.contains_key(&"k4".to_string()).await.unwrap());
    });
}

#[test]
fn mfu_evicts_the_most_read_entry() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .eviction(Mfu)
            .max_entries(2)
            .build();

        cache.put(&"hot".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"cold".to_string(), 2).await.unwrap();
        tick(&control);
        for _ in 0..5 {
            cache.get(&"hot".to_string()).await.unwrap();
            tick(&control);
        }
        cache.put(&"new".to_string(), 3).await.unwrap();

        assert!(!cache.contains_key(&"hot".to_string()).await.unwrap());
        assert!(cache.contains_key(&"cold".to_string()).await.unwrap());
        assert!(cache.contains_key(&"new".to_string()).await.unwrap());
    });
}

#[test]
fn capacity_is_never_exceeded() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .max_entries(4)
            .build();

        for i in 0..32 {
            cache.put(&format!("key_{i}"), i).await.unwrap();
            tick(&control);
            assert!(cache.len().await.unwrap() <= 4);
        }
        assert_eq!(cache.len().await.unwrap(), 4);
        assert_eq!(cache.stats().evictions, 28);
    });
}

#[test]
fn overwrites_do_not_trigger_eviction() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .max_entries(2)
            .build();

        cache.put(&"k1".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"k2".to_string(), 2).await.unwrap();
        tick(&control);

        // Replacing a live entry needs no room.
        cache.put(&"k1".to_string(), 10).await.unwrap();

        assert_eq!(cache.len().await.unwrap(), 2);
        assert_eq!(cache.stats().evictions, 0);
    });
}

#[test]
fn loader_inserts_respect_capacity() {
    use cachet::loader::CacheLoader;
    use cachet_store::BoxError;

    #[derive(Debug)]
    struct KeyEcho;

    impl CacheLoader<String, String> for KeyEcho {
        async fn load(&self, key: &String) -> Result<Option<String>, BoxError> {
            Ok(Some(key.clone()))
        }
    }

    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, String>(control.to_clock())
            .memory()
            .max_entries(2)
            .loader(KeyEcho)
            .build();

        cache.put(&"k1".to_string(), "v1".to_string()).await.unwrap();
        tick(&control);
        cache.put(&"k2".to_string(), "v2".to_string()).await.unwrap();
        tick(&control);

        // The loader materializes k3; the insert must evict first.
        assert_eq!(cache.get(&"k3".to_string()).await.unwrap().as_deref(), Some("k3"));

        assert_eq!(cache.len().await.unwrap(), 2);
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.contains_key(&"k3".to_string()).await.unwrap());
    });
}

#[test]
fn zero_capacity_rejects_every_insert() {
    block_on(async {
        let cache = Cache::builder::<String, i32>(Clock::new_frozen())
            .memory()
            .max_entries(0)
            .build();

        cache.put(&"key".to_string(), 1).await.unwrap();
        assert!(!cache.put_if_absent(&"key".to_string(), 1).await.unwrap());

        assert_eq!(cache.len().await.unwrap(), 0);
        assert_eq!(cache.get(&"key".to_string()).await.unwrap(), None);
        assert_eq!(cache.stats().evictions, 0);
    });
}

#[test]
fn expired_candidates_are_purged_instead_of_evicting() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .expiry(CreatedExpiry::new(Duration::from_secs(60)))
            .max_entries(2)
            .build();

        cache.put(&"stale".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"fresh".to_string(), 2).await.unwrap();

        // "stale" lapses; the overflow scan reclaims it without an eviction.
        control.advance(Duration::from_secs(61));
        cache.put(&"fresh".to_string(), 3).await.unwrap();
        cache.put(&"next".to_string(), 4).await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.evictions, 0);
        assert!(stats.expirations >= 1);
        assert!(cache.contains_key(&"next".to_string()).await.unwrap());
    });
}

#[test]
fn random_sampler_limits_the_candidate_pool() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .eviction(Fifo)
            .sampler(RandomSampler::with_seed(2, 7))
            .max_entries(8)
            .build();

        for i in 0..8 {
            cache.put(&format!("key_{i}"), i).await.unwrap();
            tick(&control);
        }
        cache.put(&"overflow".to_string(), 99).await.unwrap();

        // One of the sampled entries was evicted; the bound holds.
        assert_eq!(cache.len().await.unwrap(), 8);
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.contains_key(&"overflow".to_string()).await.unwrap());
    });
}

#[test]
fn eviction_happens_before_the_insert_is_visible() {
    block_on(async {
        let control = ClockControl::new();
        let cache = Cache::builder::<String, i32>(control.to_clock())
            .memory()
            .eviction(Fifo)
            .max_entries(1)
            .build();

        cache.put(&"first".to_string(), 1).await.unwrap();
        tick(&control);
        cache.put(&"second".to_string(), 2).await.unwrap();

        // The newcomer is never the victim of its own insertion.
        assert!(cache.contains_key(&"second".to_string()).await.unwrap());
        assert!(!cache.contains_key(&"first".to_string()).await.unwrap());
        assert_eq!(cache.len().await.unwrap(), 1);
    });
}
