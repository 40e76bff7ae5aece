use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::time::Duration;

/// A thread-safe cache with per-entry expiry.
///
/// Every operation takes the current time explicitly.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl<V: Clone> Cache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            default_ttl,
        }
    }

    /// Live value for `key`; an expired entry is evicted and reported missing.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > now {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    pub fn insert_at(&self, key: String, value: V, now: DateTime<Utc>) {
        self.insert_with_ttl_at(key, value, self.default_ttl, now);
    }

    pub fn insert_with_ttl_at(&self, key: String, value: V, ttl: Duration, now: DateTime<Utc>) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: expiry(now, ttl),
            },
        );
    }

    /// Drop every entry expired at `now`.
    pub fn cleanup_at(&self, now: DateTime<Utc>) {
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-03T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn get_before_and_after_expiry() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert_at("PETR4".to_string(), 38.45, t0());

        assert_eq!(cache.get_at("PETR4", t0()), Some(38.45));
        assert_eq!(cache.get_at("PETR4", t0() + TimeDelta::seconds(59)), Some(38.45));
        assert_eq!(cache.get_at("PETR4", t0() + TimeDelta::seconds(60)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_key() {
        let cache: Cache<String> = Cache::new(Duration::from_secs(60));
        assert_eq!(cache.get_at("nope", t0()), None);
    }

    #[test]
    fn custom_ttl_overrides_default() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert_with_ttl_at("short".to_string(), 1, Duration::from_secs(5), t0());
        cache.insert_at("long".to_string(), 2, t0());

        let later = t0() + TimeDelta::seconds(10);
        assert_eq!(cache.get_at("short", later), None);
        assert_eq!(cache.get_at("long", later), Some(2));
    }

    #[test]
    fn zero_ttl_never_hits() {
        let cache = Cache::new(Duration::ZERO);
        cache.insert_at("k".to_string(), 1, t0());
        assert_eq!(cache.get_at("k", t0()), None);
    }

    #[test]
    fn cleanup_removes_only_expired() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert_with_ttl_at("a".to_string(), 1, Duration::from_secs(5), t0());
        cache.insert_at("b".to_string(), 2, t0());
        assert_eq!(cache.len(), 2);

        cache.cleanup_at(t0() + TimeDelta::seconds(30));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("b", t0() + TimeDelta::seconds(30)), Some(2));
    }
}
