//! In-process fallback cache backend (spec §4.H): used when Redis is
//! unreachable, or as the sole backend in tests/dev. Bounded by entry
//! count with LRU eviction and per-entry TTL, same shape as a distributed
//! cache's contract but backed by a `RwLock<HashMap>`.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
    last_accessed: Instant,
}

pub struct MemoryFallback {
    max_entries: usize,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryFallback {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries: max_entries.max(1), entries: RwLock::new(HashMap::new()) }
    }

    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let mut entries = self.entries.write().expect("memory cache lock poisoned");
        match entries.get_mut(key) {
            Some(entry) if entry.expires_at > now => {
                entry.last_accessed = now;
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set_raw(&self, key: &str, value: &str, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().expect("memory cache lock poisoned");
        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            Self::evict_lru(&mut entries);
        }
        entries.insert(
            key.to_string(),
            Entry { value: value.to_string(), expires_at: now + ttl, last_accessed: now },
        );
    }

    pub fn delete_prefix(&self, prefix: &str) -> u64 {
        let mut entries = self.entries.write().expect("memory cache lock poisoned");
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        (before - entries.len()) as u64
    }

    fn evict_lru(entries: &mut HashMap<String, Entry>) {
        let lru_key = entries.iter().min_by_key(|(_, e)| e.last_accessed).map(|(k, _)| k.clone());
        if let Some(key) = lru_key {
            entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let cache = MemoryFallback::new(10);
        cache.set_raw("listing:abc", "payload", Duration::from_secs(60));
        assert_eq!(cache.get_raw("listing:abc"), Some("payload".to_string()));
    }

    #[test]
    fn get_returns_none_for_unknown_key() {
        let cache = MemoryFallback::new(10);
        assert_eq!(cache.get_raw("missing"), None);
    }

    #[test]
    fn expired_entry_is_treated_as_a_miss() {
        let cache = MemoryFallback::new(10);
        cache.set_raw("listing:abc", "payload", Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get_raw("listing:abc"), None);
    }

    #[test]
    fn delete_prefix_removes_only_matching_keys() {
        let cache = MemoryFallback::new(10);
        cache.set_raw("listing:1", "a", Duration::from_secs(60));
        cache.set_raw("listing:2", "b", Duration::from_secs(60));
        cache.set_raw("detail:1", "c", Duration::from_secs(60));

        let removed = cache.delete_prefix("listing:");
        assert_eq!(removed, 2);
        assert_eq!(cache.get_raw("listing:1"), None);
        assert_eq!(cache.get_raw("detail:1"), Some("c".to_string()));
    }

    #[test]
    fn capacity_eviction_drops_least_recently_used() {
        let cache = MemoryFallback::new(2);
        cache.set_raw("a", "1", Duration::from_secs(60));
        cache.set_raw("b", "2", Duration::from_secs(60));
        // touch "a" so "b" becomes the LRU entry
        let _ = cache.get_raw("a");
        cache.set_raw("c", "3", Duration::from_secs(60));

        assert_eq!(cache.get_raw("a"), Some("1".to_string()));
        assert_eq!(cache.get_raw("b"), None);
        assert_eq!(cache.get_raw("c"), Some("3".to_string()));
    }
}
