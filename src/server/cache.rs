use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::entities::RoutePlan;

/// Best-effort store of finished plans keyed by request text.
pub struct PlanCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: DateTime<Utc>,
    plan: RoutePlan,
}

pub fn cache_key(start: &str, end: &str) -> String {
    format!("route:{}:{}", start, end)
}

impl PlanCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<RoutePlan> {
        let mut entries = self.entries.lock().await;
        let now = Utc::now();

        if let Some(entry) = entries.get(key) {
            if now - entry.stored_at < self.ttl {
                return Some(entry.plan.clone());
            }

            entries.remove(key);
        }

        None
    }

    pub async fn insert(&self, key: String, plan: RoutePlan) {
        let mut entries = self.entries.lock().await;
        let now = Utc::now();
        let ttl = self.ttl;

        entries.retain(|_, entry| now - entry.stored_at < ttl);
        entries.insert(
            key,
            CacheEntry {
                stored_at: now,
                plan,
            },
        );
    }
}

#[cfg(test)]
fn sample_plan() -> RoutePlan {
    RoutePlan {
        waypoints: vec![],
        fuel_stops: vec![],
        total_fuel_cost: 12.5,
        map_url: "".into(),
    }
}

#[test]
fn stored_plan_is_returned_until_it_expires() {
    use tokio_test::block_on;

    let cache = PlanCache::new(3600);
    let key = cache_key("Chicago, IL", "Denver, CO");

    assert_eq!(key, "route:Chicago, IL:Denver, CO");
    assert!(block_on(cache.get(&key)).is_none());

    block_on(cache.insert(key.clone(), sample_plan()));
    assert_eq!(block_on(cache.get(&key)), Some(sample_plan()));
}

#[test]
fn zero_ttl_never_hits() {
    use tokio_test::block_on;

    let cache = PlanCache::new(0);
    let key = cache_key("a", "b");

    block_on(cache.insert(key.clone(), sample_plan()));
    assert!(block_on(cache.get(&key)).is_none());
}
