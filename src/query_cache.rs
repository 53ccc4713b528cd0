//! Key-addressed cache of server responses.
//!
//! Entries are stored as JSON values so one cache can hold every response type.
//! Invalidation marks entries stale instead of dropping them; the next read through
//! [`fetch_or_cached`] refetches.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// `["recipes"]`: the public recipe list.
    pub fn recipes() -> Self {
        Self::new(["recipes"])
    }

    /// `["users", id, "recipes"]`: recipes owned by one user.
    pub fn user_recipes(user_id: &str) -> Self {
        Self::new(["users", user_id, "recipes"])
    }

    /// `["auth", "user"]`: the signed-in user.
    pub fn current_user() -> Self {
        Self::new(["auth", "user"])
    }

    /// True if `prefix` matches the leading segments of this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// What happened to the cache, delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Invalidated(QueryKey),
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&CacheEvent)>;

struct CacheEntry {
    value: serde_json::Value,
    stale: bool,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, CacheEntry>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

/// Shared handle; clones see the same entries.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Rc<RefCell<CacheInner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh value for `key`, if any. Stale or undecodable entries read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let inner = self.inner.borrow();
        let entry = inner.entries.get(key).filter(|e| !e.stale)?;
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cached value for {} has unexpected shape: {}", key, e);
                None
            }
        }
    }

    #[cfg(test)]
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.inner
            .borrow()
            .entries
            .get(key)
            .is_some_and(|e| !e.stale)
    }

    pub fn set<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        debug!("Caching {}", key);
        self.inner
            .borrow_mut()
            .entries
            .insert(key, CacheEntry { value, stale: false });
        Ok(())
    }

    /// Mark `prefix` and every key under it stale. Returns how many entries were affected.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for (key, entry) in self.inner.borrow_mut().entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                count += 1;
            }
        }
        debug!("Invalidated {} ({} entries)", prefix, count);
        self.emit(CacheEvent::Invalidated(prefix.clone()));
        count
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
        debug!("Query cache cleared");
        self.emit(CacheEvent::Cleared);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self, listener: impl Fn(&CacheEvent) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    // Listeners run after the borrow is released so they may touch the cache.
    fn emit(&self, event: CacheEvent) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

/// Serve `key` from the cache when fresh, otherwise run `fetch` and store its result.
pub async fn fetch_or_cached<T, F, Fut>(cache: &QueryCache, key: QueryKey, fetch: F) -> Result<T, ApiError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    if let Some(hit) = cache.get::<T>(&key) {
        debug!("Cache hit for {}", key);
        return Ok(hit);
    }

    let value = fetch().await?;
    if let Err(e) = cache.set(key.clone(), &value) {
        warn!("Failed to cache {}: {}", key, e);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_set_and_get() {
        let cache = QueryCache::new();
        cache.set(QueryKey::recipes(), &vec![1, 2, 3]).unwrap();
        assert_eq!(cache.get::<Vec<i32>>(&QueryKey::recipes()), Some(vec![1, 2, 3]));
        assert!(cache.is_fresh(&QueryKey::recipes()));
    }

    #[test]
    fn test_get_missing_key() {
        let cache = QueryCache::new();
        assert_eq!(cache.get::<Vec<i32>>(&QueryKey::recipes()), None);
    }

    #[test]
    fn test_invalidate_is_prefix_based() {
        let cache = QueryCache::new();
        cache.set(QueryKey::user_recipes("1"), &vec!["a"]).unwrap();
        cache.set(QueryKey::user_recipes("2"), &vec!["b"]).unwrap();
        cache.set(QueryKey::recipes(), &vec!["c"]).unwrap();

        let affected = cache.invalidate(&QueryKey::new(["users"]));
        assert_eq!(affected, 2);
        assert!(!cache.is_fresh(&QueryKey::user_recipes("1")));
        assert!(!cache.is_fresh(&QueryKey::user_recipes("2")));
        assert!(cache.is_fresh(&QueryKey::recipes()));
        // Stale entries are kept, only hidden from fresh reads.
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_prefix_does_not_match_longer_segment() {
        let key = QueryKey::new(["recipes-archive"]);
        assert!(!key.starts_with(&QueryKey::recipes()));
        assert!(QueryKey::user_recipes("9").starts_with(&QueryKey::new(["users", "9"])));
    }

    #[test]
    fn test_clear_empties_and_notifies() {
        let cache = QueryCache::new();
        cache.set(QueryKey::recipes(), &1).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        cache.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(*events.borrow(), vec![CacheEvent::Cleared]);
    }

    #[test]
    fn test_unsubscribe_stops_events() {
        let cache = QueryCache::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = cache.subscribe(move |_| counter.set(counter.get() + 1));

        cache.invalidate(&QueryKey::recipes());
        cache.unsubscribe(id);
        cache.invalidate(&QueryKey::recipes());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listener_may_reenter_cache() {
        let cache = QueryCache::new();
        let inner = cache.clone();
        cache.subscribe(move |_| {
            let _ = inner.is_fresh(&QueryKey::recipes());
        });
        cache.invalidate(&QueryKey::recipes());
    }

    #[tokio::test]
    async fn test_fetch_or_cached_skips_fetch_when_fresh() {
        let cache = QueryCache::new();
        let calls = Cell::new(0);

        let first: Vec<String> = fetch_or_cached(&cache, QueryKey::recipes(), || async {
            calls.set(calls.get() + 1);
            Ok(vec!["soup".to_string()])
        })
        .await
        .unwrap();
        let second: Vec<String> = fetch_or_cached(&cache, QueryKey::recipes(), || async {
            calls.set(calls.get() + 1);
            Ok(vec![])
        })
        .await
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_fetch_or_cached_refetches_after_invalidate() {
        let cache = QueryCache::new();
        cache.set(QueryKey::recipes(), &vec!["old".to_string()]).unwrap();
        cache.invalidate(&QueryKey::recipes());

        let value: Vec<String> = fetch_or_cached(&cache, QueryKey::recipes(), || async {
            Ok(vec!["new".to_string()])
        })
        .await
        .unwrap();
        assert_eq!(value, vec!["new".to_string()]);
        assert!(cache.is_fresh(&QueryKey::recipes()));
    }

    #[tokio::test]
    async fn test_fetch_or_cached_does_not_store_errors() {
        let cache = QueryCache::new();
        let result: Result<Vec<String>, _> = fetch_or_cached(&cache, QueryKey::recipes(), || async {
            Err(ApiError::Network("offline".into()))
        })
        .await;
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
