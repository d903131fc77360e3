//! In-memory cache for read queries
//!
//! Each query kind gets its own [`QueryCache`], keyed by [`QueryKey`]. Results
//! stay fresh for the configured TTL, concurrent requests for one key share a
//! single load, and loads run on their own task so a caller that stops
//! waiting does not cancel the fetch. Failed loads are retried with
//! exponential backoff and are never cached.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Longest delay between two attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Cache key: the query kind plus the identifier it is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    scope: &'static str,
    id: Uuid,
}

impl QueryKey {
    pub fn borrower(id: Uuid) -> Self {
        Self {
            scope: "borrower",
            id,
        }
    }

    pub fn borrower_loans(id: Uuid) -> Self {
        Self {
            scope: "borrower-loans",
            id,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.id)
    }
}

/// A query that could not produce a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query {key} failed after {attempts} attempt(s): {message}")]
    Failed {
        key: String,
        attempts: u32,
        message: String,
    },

    #[error("query {key} was aborted: {message}")]
    Aborted { key: String, message: String },
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Freshness, size and retry settings
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub max_entries: usize,
    /// Attempts made after the first failure
    pub retry_attempts: u32,
    pub retry_base_delay: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_entries: 1024,
            retry_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

impl CachePolicy {
    /// Delay before retry number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.retry_base_delay
            .saturating_mul(factor)
            .min(MAX_RETRY_DELAY)
    }
}

struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

type InFlight<V> = Shared<BoxFuture<'static, QueryResult<V>>>;

pub struct QueryCache<V> {
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry<V>>>>,
    in_flight: Arc<Mutex<HashMap<QueryKey, InFlight<V>>>>,
    policy: CachePolicy,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            in_flight: self.in_flight.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            policy,
        }
    }

    /// Cached value for `key`, if present and still fresh
    pub async fn get(&self, key: &QueryKey) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.policy.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Return the cached value for `key` or run `loader` to produce it.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, loader: F) -> QueryResult<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(query = %key, "Query cache hit");
            return Ok(value);
        }

        let load = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&key) {
                Some(load) => {
                    tracing::debug!(query = %key, "Joining in-flight query");
                    load.clone()
                }
                None => {
                    tracing::debug!(query = %key, "Query cache miss");
                    let load = self.spawn_load(key, loader);
                    in_flight.insert(key, load.clone());
                    load
                }
            }
        };

        load.await
    }

    /// Drop the cached value for `key`. A load already in flight still
    /// stores its result when it completes.
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            tracing::debug!(query = %key, "Query cache entry invalidated");
        }
        removed
    }

    /// Remove expired entries, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let ttl = self.policy.ttl;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn spawn_load<F, Fut>(&self, key: QueryKey, loader: F) -> InFlight<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let entries = self.entries.clone();
        let in_flight = self.in_flight.clone();
        let policy = self.policy.clone();

        let task = tokio::spawn({
            let in_flight = in_flight.clone();
            async move {
                let result = load_with_retry(key, &policy, loader).await;
                if let Ok(value) = &result {
                    store(&entries, &policy, key, value.clone()).await;
                }
                in_flight.lock().await.remove(&key);
                result
            }
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(err) => {
                    in_flight.lock().await.remove(&key);
                    tracing::error!(query = %key, error = %err, "Query task aborted");
                    Err(QueryError::Aborted {
                        key: key.to_string(),
                        message: err.to_string(),
                    })
                }
            }
        }
        .boxed()
        .shared()
    }
}

async fn load_with_retry<V, F, Fut>(key: QueryKey, policy: &CachePolicy, loader: F) -> QueryResult<V>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<V>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match loader().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt <= policy.retry_attempts => {
                let delay = policy.retry_delay(attempt);
                tracing::warn!(
                    query = %key,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Query failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                tracing::error!(query = %key, attempts = attempt, error = %err, "Query failed");
                return Err(QueryError::Failed {
                    key: key.to_string(),
                    attempts: attempt,
                    message: format!("{:#}", err),
                });
            }
        }
    }
}

async fn store<V>(
    entries: &RwLock<HashMap<QueryKey, CacheEntry<V>>>,
    policy: &CachePolicy,
    key: QueryKey,
    value: V,
) {
    if policy.max_entries == 0 {
        return;
    }

    let mut entries = entries.write().await;
    if !entries.contains_key(&key) && entries.len() >= policy.max_entries {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.fetched_at)
            .map(|(key, _)| *key);
        if let Some(oldest) = oldest {
            tracing::debug!(query = %oldest, "Evicting oldest query cache entry");
            entries.remove(&oldest);
        }
    }

    entries.insert(
        key,
        CacheEntry {
            value,
            fetched_at: Instant::now(),
        },
    );
}
