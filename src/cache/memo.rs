// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Memoizing call table with in-flight sharing and optional LRU bound

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::{AccessSequence, CacheKey, CacheStats};

type SharedCall<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

enum Slot<V, E> {
    /// A stored success
    Ready {
        value: V,
        last_access: AccessSequence,
    },
    /// A remote call that has started but not resolved
    InFlight(SharedCall<V, E>),
}

struct CacheState<V, E> {
    slots: HashMap<CacheKey, Slot<V, E>>,
    stats: CacheStats,
    next_seq: AccessSequence,
}

impl<V, E> CacheState<V, E> {
    fn bump_seq(&mut self) -> AccessSequence {
        let seq = self.next_seq;
        self.next_seq = seq.next();
        seq
    }

    /// Evicts the least recently used stored result. In-flight calls are
    /// never evicted.
    fn evict_lru(&mut self) -> bool {
        let lru_key = self
            .slots
            .iter()
            .filter_map(|(key, slot)| match slot {
                Slot::Ready { last_access, .. } => Some((key, *last_access)),
                Slot::InFlight(_) => None,
            })
            .min_by_key(|(_, last_access)| *last_access)
            .map(|(key, _)| key.clone());

        match lru_key {
            Some(key) => {
                debug!(key = %key, "Evicting LRU cache entry");
                self.slots.remove(&key);
                self.stats.evictions += 1;
                self.stats.entries -= 1;
                true
            }
            None => false,
        }
    }
}

/// Where the answer to a lookup came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// Served from a stored result; no remote call was made
    Cached,
    /// Shared the outcome of a call another caller had already started
    Joined,
    /// This caller started the remote call
    Fresh,
}

/// Outcome of [`CallCache::get_or_try_insert_with`]
#[derive(Debug, Clone)]
pub struct Lookup<V, E> {
    /// Where the result came from
    pub source: LookupSource,
    /// The stored value, or the error shared by every caller of the failed call
    pub result: Result<V, E>,
}

enum Answer<V, E> {
    Ready(V),
    Waiting(SharedCall<V, E>),
}

/// A lookup that has been resolved up to the point of waiting
///
/// Dropping it abandons only this caller's wait; a started call still runs to
/// completion and settles the cache.
#[must_use = "a pending lookup does nothing unless waited on"]
pub struct Pending<V, E> {
    source: LookupSource,
    answer: Answer<V, E>,
}

impl<V, E> Pending<V, E>
where
    V: Clone,
    E: Clone,
{
    /// Where the answer will come from
    pub fn source(&self) -> LookupSource {
        self.source
    }

    /// Wait for the answer
    pub async fn wait(self) -> Lookup<V, E> {
        let result = match self.answer {
            Answer::Ready(value) => Ok(value),
            Answer::Waiting(call) => call.await,
        };
        Lookup {
            source: self.source,
            result,
        }
    }
}

/// Memoizing table for remote call results
///
/// Keys are unique. Per key, at most one remote call is ever running: the first
/// caller installs an in-flight marker holding a shared future, and concurrent
/// callers for the same key await that same future. Successes are stored and
/// served until the process ends (or until evicted, when a bound is set);
/// failures are delivered to every waiting caller and then dropped, so the next
/// call for the key tries again.
///
/// Started calls are driven on the tokio runtime independently of their
/// callers, so a caller that gives up never strands the in-flight marker. Calls
/// to [`get_or_try_insert_with`](Self::get_or_try_insert_with) must therefore
/// happen inside a tokio runtime.
///
/// # Examples
///
/// ```rust
/// use assetledger::cache::{CacheKey, CallCache, KeyPart, LookupSource};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache: CallCache<u64, String> = CallCache::new();
/// let key = CacheKey::new("balance", "balanceOf", vec![KeyPart::Id(1)]);
///
/// let first = cache.get_or_try_insert_with(key.clone(), || async { Ok(7) }).await;
/// assert_eq!(first.source, LookupSource::Fresh);
///
/// let second = cache.get_or_try_insert_with(key, || async { Ok(8) }).await;
/// assert_eq!(second.source, LookupSource::Cached);
/// assert_eq!(second.result, Ok(7));
/// # }
/// ```
///
/// # Performance
///
/// - Lookup: O(1) average case (HashMap lookup)
/// - Store: O(1) without a bound, O(n) when the bound forces an eviction
pub struct CallCache<V, E> {
    state: Arc<Mutex<CacheState<V, E>>>,
    max_entries: Option<usize>,
}

impl<V, E> CallCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded cache
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                slots: HashMap::new(),
                stats: CacheStats::default(),
                next_seq: AccessSequence::default(),
            })),
            max_entries: None,
        }
    }

    /// Sets the maximum number of stored results
    ///
    /// When the limit is reached, the least recently used stored result is
    /// evicted to make room. A limit of zero is treated as one.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    /// Returns the stored result for `key` without touching statistics or LRU
    /// order
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        match lock(&self.state).slots.get(key) {
            Some(Slot::Ready { value, .. }) => Some(value.clone()),
            _ => None,
        }
    }

    /// Returns true if a result is stored for `key`
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        matches!(lock(&self.state).slots.get(key), Some(Slot::Ready { .. }))
    }

    /// Returns true if a remote call for `key` is currently running
    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        matches!(lock(&self.state).slots.get(key), Some(Slot::InFlight(_)))
    }

    /// Number of stored results
    pub fn len(&self) -> usize {
        lock(&self.state).stats.entries
    }

    /// Returns true if no results are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns current cache statistics
    pub fn stats(&self) -> CacheStats {
        lock(&self.state).stats.clone()
    }

    /// Returns the stored result for `key`, joins the call already running for
    /// it, or starts `make_call` and remembers its success.
    ///
    /// Shorthand for [`start`](Self::start) followed by [`Pending::wait`].
    pub async fn get_or_try_insert_with<F, Fut>(&self, key: CacheKey, make_call: F) -> Lookup<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        self.start(key, make_call).wait().await
    }

    /// Resolve `key` up to the point of waiting.
    ///
    /// Checking the table and marking the key in flight happen under one lock,
    /// so concurrent callers for the same key can never both start a call.
    /// `make_call` is only invoked when this caller starts the call, and the
    /// started call is spawned before this returns. The returned [`Pending`]
    /// tells the caller where the answer will come from before it waits.
    pub fn start<F, Fut>(&self, key: CacheKey, make_call: F) -> Pending<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (source, call) = {
            let mut guard = lock(&self.state);
            let state = &mut *guard;
            let seq = state.bump_seq();

            match state.slots.get_mut(&key) {
                Some(Slot::Ready { value, last_access }) => {
                    *last_access = seq;
                    let value = value.clone();
                    state.stats.hits += 1;
                    debug!(key = %key, "Cache hit");
                    return Pending {
                        source: LookupSource::Cached,
                        answer: Answer::Ready(value),
                    };
                }
                Some(Slot::InFlight(call)) => {
                    let call = call.clone();
                    state.stats.joined += 1;
                    debug!(key = %key, "Joining in-flight call");
                    (LookupSource::Joined, call)
                }
                None => {
                    state.stats.misses += 1;
                    debug!(key = %key, "Cache miss");
                    let call = self.start_call(key.clone(), make_call());
                    state.slots.insert(key, Slot::InFlight(call.clone()));
                    (LookupSource::Fresh, call)
                }
            }
        };

        if source == LookupSource::Fresh {
            tokio::spawn(call.clone());
        }

        Pending {
            source,
            answer: Answer::Waiting(call),
        }
    }

    /// Wraps `call` so that its outcome settles the slot for `key` exactly once,
    /// whichever poller drives it to completion.
    ///
    /// A panicking call clears its slot before the panic resumes, so callers
    /// already waiting on it see the panic and the next caller starts afresh.
    fn start_call<Fut>(&self, key: CacheKey, call: Fut) -> SharedCall<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let max_entries = self.max_entries;

        async move {
            match AssertUnwindSafe(call).catch_unwind().await {
                Ok(result) => {
                    settle(&state, key, &result, max_entries);
                    result
                }
                Err(payload) => {
                    abandon(&state, &key);
                    panic::resume_unwind(payload)
                }
            }
        }
        .boxed()
        .shared()
    }
}

fn settle<V: Clone, E>(
    state: &Mutex<CacheState<V, E>>,
    key: CacheKey,
    result: &Result<V, E>,
    max_entries: Option<usize>,
) {
    let mut guard = lock(state);
    let state = &mut *guard;

    match result {
        Ok(value) => {
            if let Some(max_entries) = max_entries {
                while state.stats.entries >= max_entries && state.evict_lru() {}
            }
            let seq = state.bump_seq();
            debug!(key = %key, "Storing result");
            state.slots.insert(
                key,
                Slot::Ready {
                    value: value.clone(),
                    last_access: seq,
                },
            );
            state.stats.entries += 1;
        }
        Err(_) => {
            debug!(key = %key, "Call failed, nothing stored");
            state.slots.remove(&key);
            state.stats.failures += 1;
        }
    }
}

fn abandon<V, E>(state: &Mutex<CacheState<V, E>>, key: &CacheKey) {
    let mut state = lock(state);
    warn!(key = %key, "Call panicked, clearing in-flight marker");
    state.slots.remove(key);
    state.stats.failures += 1;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V, E> Default for CallCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> fmt::Debug for CallCache<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = lock(&self.state).stats.clone();
        f.debug_struct("CallCache")
            .field("max_entries", &self.max_entries)
            .field("stats", &stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::KeyPart;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key(id: u32) -> CacheKey {
        CacheKey::new("assetDetails", "retrieveAssetDetails", vec![KeyPart::Id(id)])
    }

    fn counted(
        calls: &Arc<AtomicUsize>,
        result: Result<u32, String>,
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u32, String>> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                result
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_success_is_stored_and_reused() {
        let cache: CallCache<u32, String> = CallCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_try_insert_with(key(1), counted(&calls, Ok(10), Duration::ZERO))
            .await;
        assert_eq!(first.source, LookupSource::Fresh);
        assert_eq!(first.result, Ok(10));

        let second = cache
            .get_or_try_insert_with(key(1), counted(&calls, Ok(99), Duration::ZERO))
            .await;
        assert_eq!(second.source, LookupSource::Cached);
        assert_eq!(second.result, Ok(10), "Stored value should be returned");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_stored() {
        let cache: CallCache<u32, String> = CallCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let failed = cache
            .get_or_try_insert_with(key(1), counted(&calls, Err("boom".into()), Duration::ZERO))
            .await;
        assert_eq!(failed.result, Err("boom".to_string()));
        assert!(!cache.contains_key(&key(1)));
        assert!(!cache.is_in_flight(&key(1)));

        let retried = cache
            .get_or_try_insert_with(key(1), counted(&calls, Ok(5), Duration::ZERO))
            .await;
        assert_eq!(retried.source, LookupSource::Fresh);
        assert_eq!(retried.result, Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 2, "Failure must not suppress retry");
        assert_eq!(cache.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_call() {
        let cache: CallCache<u32, String> = CallCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let lookups = futures::future::join_all((0..8).map(|_| {
            cache.get_or_try_insert_with(
                key(3),
                counted(&calls, Ok(33), Duration::from_millis(30)),
            )
        }))
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lookups.iter().all(|l| l.result == Ok(33)));
        assert_eq!(
            lookups
                .iter()
                .filter(|l| l.source == LookupSource::Fresh)
                .count(),
            1
        );
        assert_eq!(cache.stats().joined, 7);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_failure() {
        let cache: CallCache<u32, String> = CallCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let lookups = futures::future::join_all((0..5).map(|_| {
            cache.get_or_try_insert_with(
                key(4),
                counted(&calls, Err("down".into()), Duration::from_millis(30)),
            )
        }))
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lookups.iter().all(|l| l.result == Err("down".to_string())));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_abandoned_call_still_settles() {
        let cache: Arc<CallCache<u32, String>> = Arc::new(CallCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let task = {
            let cache = Arc::clone(&cache);
            let make_call = counted(&calls, Ok(8), Duration::from_millis(40));
            tokio::spawn(async move { cache.get_or_try_insert_with(key(8), make_call).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.is_in_flight(&key(8)));
        task.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!cache.is_in_flight(&key(8)), "In-flight marker must not be stranded");
        assert_eq!(cache.get(&key(8)), Some(8));
    }

    #[tokio::test]
    async fn test_panicked_call_is_retried() {
        let cache: Arc<CallCache<u32, String>> = Arc::new(CallCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let panics_first = |calls: &Arc<AtomicUsize>| {
            let calls = Arc::clone(calls);
            move || {
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        panic!("remote call panicked");
                    }
                    Ok(2)
                }
                .boxed()
            }
        };

        let first = {
            let cache = Arc::clone(&cache);
            let make_call = panics_first(&calls);
            tokio::spawn(async move { cache.get_or_try_insert_with(key(6), make_call).await })
        };
        assert!(first.await.unwrap_err().is_panic());
        assert!(!cache.is_in_flight(&key(6)), "Panicked call must not stay in flight");
        assert_eq!(cache.stats().failures, 1);

        let retried = cache
            .get_or_try_insert_with(key(6), panics_first(&calls))
            .await;
        assert_eq!(retried.source, LookupSource::Fresh);
        assert_eq!(retried.result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2, "Retry must reach the remote again");
    }

    #[tokio::test]
    async fn test_lru_bound_evicts_least_recently_used() {
        let cache: CallCache<u32, String> = CallCache::new().with_max_entries(2);
        let calls = Arc::new(AtomicUsize::new(0));

        for id in 1..=2 {
            cache
                .get_or_try_insert_with(key(id), counted(&calls, Ok(id), Duration::ZERO))
                .await;
        }

        // Touch 1 so that 2 becomes the least recently used
        cache
            .get_or_try_insert_with(key(1), counted(&calls, Ok(0), Duration::ZERO))
            .await;
        cache
            .get_or_try_insert_with(key(3), counted(&calls, Ok(3), Duration::ZERO))
            .await;

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.evictions, 1);
        assert!(cache.contains_key(&key(1)));
        assert!(!cache.contains_key(&key(2)));
        assert!(cache.contains_key(&key(3)));
    }
}
