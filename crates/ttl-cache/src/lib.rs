//! A time-bounded key/value store with max-size eviction.
//!
//! Grounded on the teacher's `lruttl` crate: entries expire on an
//! `Instant`-based deadline and are dropped lazily on read, while a hard
//! capacity is enforced on write by first clearing expired entries and then,
//! if that wasn't enough, dropping the oldest 10% by insertion order.
//! Unlike `lruttl` this cache is not itself an LRU — recency of *access*
//! never reorders an entry, only insertion order matters for eviction,
//! matching the data model's eviction rule.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Clone)]
struct Item<V> {
    value: V,
    expires_at: Instant,
}

struct State<K, V> {
    entries: HashMap<K, Item<V>>,
    /// Insertion order, oldest first. May contain keys that have since been
    /// removed (by delete/clear/expiry); those are skipped lazily.
    order: VecDeque<K>,
}

pub struct TtlCache<K, V> {
    name: String,
    default_ttl: Duration,
    max_entries: usize,
    inner: Mutex<State<K, V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_limits(name, DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_limits(name: impl Into<String>, default_ttl: Duration, max_entries: usize) -> Self {
        let name = name.into();
        tracing::debug!(cache = %name, max_entries, ?default_ttl, "creating ttl cache");
        Self {
            name,
            default_ttl,
            max_entries,
            inner: Mutex::new(State {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Returns the value iff an entry exists and has not yet expired. A
    /// read that finds an expired entry removes it and returns `None`.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.inner.lock();
        let now = Instant::now();
        let hit = match state.entries.get(key) {
            Some(item) if now <= item.expires_at => Some(item.value.clone()),
            Some(_) => None,
            None => return None,
        };
        if hit.is_none() {
            state.entries.remove(key);
            tracing::trace!(cache = %self.name, "entry expired on read");
        }
        hit
    }

    pub fn has(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key`, expiring at `now + ttl` (or the cache's
    /// default TTL if `ttl` is `None`). If the cache is already at capacity,
    /// expired entries are purged first; if that still leaves it at
    /// capacity, the oldest 10% by insertion order are dropped.
    pub fn set(&self, key: K, value: V, ttl: Option<Duration>) {
        let mut state = self.inner.lock();
        let now = Instant::now();

        if state.entries.len() >= self.max_entries {
            Self::cleanup_locked(&mut state, now);
        }
        if state.entries.len() >= self.max_entries {
            let evict = (self.max_entries / 10).max(1);
            Self::evict_oldest_locked(&mut state, evict);
            tracing::debug!(cache = %self.name, evict, "cache at capacity, evicted oldest entries");
        }

        let expires_at = now + ttl.unwrap_or(self.default_ttl);
        let is_new = !state.entries.contains_key(&key);
        state.entries.insert(key.clone(), Item { value, expires_at });
        if is_new {
            state.order.push_back(key);
        }
    }

    pub fn delete(&self, key: &K) -> bool {
        let mut state = self.inner.lock();
        state.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.entries.clear();
        state.order.clear();
    }

    /// Removes all expired entries and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let mut state = self.inner.lock();
        let before = state.entries.len();
        Self::cleanup_locked(&mut state, Instant::now());
        before - state.entries.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cleanup_locked(state: &mut State<K, V>, now: Instant) {
        state.entries.retain(|_, item| item.expires_at > now);
    }

    fn evict_oldest_locked(state: &mut State<K, V>, count: usize) {
        let mut evicted = 0;
        while evicted < count {
            match state.order.pop_front() {
                Some(key) => {
                    if state.entries.remove(&key).is_some() {
                        evicted += 1;
                    }
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_within_ttl() {
        let cache: TtlCache<String, u32> =
            TtlCache::with_limits("test", Duration::from_secs(60), 100);
        cache.set("a".to_string(), 1, None);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
    }

    #[test]
    fn expires_after_ttl() {
        let cache: TtlCache<String, u32> =
            TtlCache::with_limits("test", Duration::from_millis(10), 100);
        cache.set("a".to_string(), 1, None);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(!cache.has(&"a".to_string()));
    }

    #[test]
    fn per_entry_ttl_overrides_default() {
        let cache: TtlCache<String, u32> =
            TtlCache::with_limits("test", Duration::from_secs(60), 100);
        cache.set("a".to_string(), 1, Some(Duration::from_millis(10)));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn delete_removes_entry() {
        let cache: TtlCache<String, u32> = TtlCache::new("test");
        cache.set("a".to_string(), 1, None);
        assert!(cache.delete(&"a".to_string()));
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn cleanup_counts_removed_expired_entries() {
        let cache: TtlCache<String, u32> =
            TtlCache::with_limits("test", Duration::from_millis(10), 100);
        cache.set("a".to_string(), 1, None);
        cache.set("b".to_string(), 2, None);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn eviction_drops_oldest_tenth_by_insertion_order_when_full() {
        let cache: TtlCache<u32, u32> = TtlCache::with_limits("test", Duration::from_secs(60), 10);
        for i in 0..10 {
            cache.set(i, i, None);
        }
        assert_eq!(cache.len(), 10);

        // Cache is full and nothing has expired, so inserting one more
        // must evict the oldest entry (key 0).
        cache.set(10, 10, None);
        assert!(cache.get(&0).is_none());
        assert!(cache.get(&10).is_some());
    }

    #[test]
    fn clear_empties_cache() {
        let cache: TtlCache<String, u32> = TtlCache::new("test");
        cache.set("a".to_string(), 1, None);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
