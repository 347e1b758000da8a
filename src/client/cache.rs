//! Client-side query cache keyed by resource tag.
//!
//! Each tag owns one slot. Reads serve the slot while it is fresh and fetch
//! otherwise; fetches for the same tag never overlap. Invalidation bumps the
//! tag's generation instead of touching the slot, so a fetch that was already
//! running when the data changed is stored as stale and refetched next time.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

struct Cached<T> {
    generation: u64,
    value: Arc<T>,
}

struct Entry<T> {
    generation: AtomicU64,
    slot: tokio::sync::Mutex<Option<Cached<T>>>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            slot: tokio::sync::Mutex::new(None),
        }
    }
}

/// Cache of shared, immutable snapshots. A snapshot is replaced wholesale on
/// refetch and never mutated in place.
pub struct QueryCache<T> {
    entries: Mutex<HashMap<String, Arc<Entry<T>>>>,
}

impl<T> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, key: &str) -> Arc<Entry<T>> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        Arc::clone(entries.entry(key.to_string()).or_default())
    }

    /// Return the fresh value for `key`, running `fetch` if there is none.
    ///
    /// Concurrent callers for the same key wait for the in-flight fetch and
    /// share its result. A failed fetch leaves the slot as it was.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let entry = self.entry(key);
        let mut slot = entry.slot.lock().await;
        let generation = entry.generation.load(Ordering::Acquire);

        if let Some(cached) = slot.as_ref() {
            if cached.generation == generation {
                return Ok(cached.value.clone());
            }
        }

        tracing::debug!("Fetching {}", key);
        let value = Arc::new(fetch().await?);
        *slot = Some(Cached {
            generation,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Mark `key` stale so the next read refetches.
    pub fn invalidate(&self, key: &str) {
        tracing::debug!("Invalidating {}", key);
        self.entry(key).generation.fetch_add(1, Ordering::AcqRel);
    }

    /// The fresh value for `key` without fetching. `None` while a fetch is in
    /// flight, after invalidation, or before the first read.
    pub fn peek(&self, key: &str) -> Option<Arc<T>> {
        let entry = self.entry(key);
        let slot = entry.slot.try_lock().ok()?;
        let generation = entry.generation.load(Ordering::Acquire);
        let value = slot
            .as_ref()
            .filter(|cached| cached.generation == generation)
            .map(|cached| cached.value.clone());
        value
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio_test::assert_ok;

    async fn counted(counter: &AtomicUsize, value: u32) -> Result<u32, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test]
    async fn serves_cached_value_while_fresh() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        let first = assert_ok!(cache.get_or_fetch("notes", || counted(&fetches, 1)).await);
        let second = assert_ok!(cache.get_or_fetch("notes", || counted(&fetches, 2)).await);

        assert_eq!(*first, 1);
        assert_eq!(*second, 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refetches_after_invalidation() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        assert_ok!(cache.get_or_fetch("notes", || counted(&fetches, 1)).await);
        cache.invalidate("notes");
        assert!(cache.peek("notes").is_none());

        let value = assert_ok!(cache.get_or_fetch("notes", || counted(&fetches, 2)).await);
        assert_eq!(*value, 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.peek("notes").as_deref(), Some(&2));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        assert_ok!(cache.get_or_fetch("a", || counted(&fetches, 1)).await);
        assert_ok!(cache.get_or_fetch("b", || counted(&fetches, 2)).await);
        cache.invalidate("a");

        assert!(cache.peek("a").is_none());
        assert_eq!(cache.peek("b").as_deref(), Some(&2));
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache: QueryCache<u32> = QueryCache::new();

        let result = cache
            .get_or_fetch("notes", || async { Err::<u32, _>("offline") })
            .await;
        assert_eq!(result.unwrap_err(), "offline");
        assert!(cache.peek("notes").is_none());

        let value = assert_ok!(
            cache
                .get_or_fetch("notes", || async { Ok::<_, &str>(7) })
                .await
        );
        assert_eq!(*value, 7);
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_fetch() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        let slow = || async {
            fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, String>(42)
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch("notes", slow),
            cache.get_or_fetch("notes", slow)
        );

        assert_eq!(*a.unwrap(), 42);
        assert_eq!(*b.unwrap(), 42);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_during_fetch_leaves_value_stale() {
        let cache = Arc::new(QueryCache::new());
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let reader = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("notes", || async move {
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };

        started_rx.await.unwrap();
        cache.invalidate("notes");
        release_tx.send(()).unwrap();

        let value = reader.await.unwrap().unwrap();
        assert_eq!(*value, 1);
        assert!(cache.peek("notes").is_none());
    }
}
