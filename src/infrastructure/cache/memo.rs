//! Process-wide memoization cache using moka

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use moka::future::Cache as MokaCache;

use crate::domain::{DomainError, PredictionOutcome};

/// Value returned by [`MemoCache::get_or_try_insert`]
#[derive(Debug, Clone, PartialEq)]
pub struct Memoized<V> {
    pub value: V,
    /// `false` when this call ran the computation
    pub hit: bool,
}

/// Append-only cache keyed by the literal input string.
///
/// Entries never expire and there is no capacity bound. Concurrent lookups of
/// a missing key run the computation once; the other callers wait for it.
/// Failed computations are not stored.
#[derive(Debug, Clone)]
pub struct MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: Option<MokaCache<String, V>>,
}

/// Memo cache of prediction outcomes keyed by the submitted SMILES
pub type PredictionCache = MemoCache<PredictionOutcome>;

impl<V> MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            cache: Some(MokaCache::builder().build()),
        }
    }

    /// A cache that stores nothing; every lookup runs the computation
    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        match &self.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    /// Returns the cached value for `key`, computing and storing it on a miss
    pub async fn get_or_try_insert<F>(&self, key: &str, compute: F) -> Result<Memoized<V>, DomainError>
    where
        F: Future<Output = Result<V, DomainError>>,
    {
        let Some(cache) = &self.cache else {
            let value = compute.await?;
            return Ok(Memoized { value, hit: false });
        };

        let computed = AtomicBool::new(false);
        let value = cache
            .try_get_with(key.to_string(), async {
                computed.store(true, Ordering::Relaxed);
                compute.await
            })
            .await
            .map_err(|e: Arc<DomainError>| (*e).clone())?;

        Ok(Memoized {
            value,
            hit: !computed.load(Ordering::Relaxed),
        })
    }

    /// Number of stored entries, after pending maintenance has run
    pub async fn len(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            }
            None => 0,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> Default for MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
