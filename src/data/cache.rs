//! Time-bounded cache for loaded tables.
//!
//! Entries are keyed by resource identifier and hold the value together with
//! the instant it was stored. The caller supplies `now`, so freshness is
//! decided without reading a clock inside the cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default lifetime of a cached dataset.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Key-value store whose entries expire after `ttl`.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, Entry<V>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &str, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| &entry.value)
    }

    /// Store `value` under `key`, replacing whatever was there.
    pub fn insert(&mut self, key: &str, now: Instant, value: V) -> &V {
        let entry = Entry {
            value,
            stored_at: now,
        };
        self.entries.insert(key.to_string(), entry);
        &self.entries[key].value
    }

    /// Return the fresh value for `key`, running `load` only when the entry
    /// is missing or expired. A failed load leaves the cache unchanged.
    pub fn get_or_load<E>(
        &mut self,
        key: &str,
        now: Instant,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        if self.get(key, now).is_some() {
            debug!("Cache hit for {}", key);
            return Ok(&self.entries[key].value);
        }

        debug!("Cache miss for {}", key);
        let value = load()?;
        Ok(self.insert(key, now, value))
    }

    /// Drop the entry for `key` so the next lookup reloads it.
    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const KEY: &str = "votes.csv";

    #[test]
    fn reuses_value_within_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(3600));
        let start = Instant::now();
        let loads = Cell::new(0);
        let load = || -> Result<u32, ()> {
            loads.set(loads.get() + 1);
            Ok(loads.get())
        };

        assert_eq!(cache.get_or_load(KEY, start, load), Ok(&1));
        assert_eq!(
            cache.get_or_load(KEY, start + Duration::from_secs(3599), load),
            Ok(&1)
        );
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn reloads_after_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(3600));
        let start = Instant::now();

        cache.insert(KEY, start, "old");
        let later = start + Duration::from_secs(3600);
        assert_eq!(cache.get(KEY, later), None);

        let value = cache.get_or_load(KEY, later, || Ok::<_, ()>("new"));
        assert_eq!(value, Ok(&"new"));
        assert_eq!(cache.get(KEY, later), Some(&"new"));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache: TtlCache<u32> = TtlCache::default();
        let now = Instant::now();

        assert_eq!(cache.get_or_load(KEY, now, || Err("offline")), Err("offline"));
        assert_eq!(cache.get(KEY, now), None);
    }

    #[test]
    fn keys_are_independent() {
        let mut cache = TtlCache::default();
        let now = Instant::now();
        cache.insert("a", now, 1);
        cache.insert("b", now, 2);
        cache.invalidate("a");

        assert_eq!(cache.get("a", now), None);
        assert_eq!(cache.get("b", now), Some(&2));
    }
}
