//! Concurrent fan-out of independent reads

use std::{future::Future, hash::Hash};

use indexmap::IndexMap;
use tokio::task::JoinSet;

use crate::error::{AppError, AppResult};

/// Run two independent reads side by side.
///
/// Returns both results, or the first error; the other read is dropped.
pub async fn fetch_pair<A, B>(
    a: impl Future<Output = AppResult<A>>,
    b: impl Future<Output = AppResult<B>>,
) -> AppResult<(A, B)> {
    tokio::try_join!(a, b)
}

/// Run named reads as separate tasks and wait for all of them.
///
/// Results come back under the same keys, in the order given. The first
/// failure aborts the reads still in flight and is returned.
pub async fn fetch_all<K, T, F>(reads: Vec<(K, F)>) -> AppResult<IndexMap<K, T>>
where
    K: Hash + Eq,
    T: Send + 'static,
    F: Future<Output = AppResult<T>> + Send + 'static,
{
    let mut keys = Vec::with_capacity(reads.len());
    let mut join_set = JoinSet::new();

    for (idx, (key, read)) in reads.into_iter().enumerate() {
        keys.push(key);
        join_set.spawn(async move { (idx, read.await) });
    }

    let mut results: Vec<Option<T>> = keys.iter().map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (idx, result) =
            joined.map_err(|e| AppError::Internal(format!("Fetch task failed: {}", e)))?;
        match result {
            Ok(value) => results[idx] = Some(value),
            Err(e) => {
                join_set.abort_all();
                return Err(e);
            }
        }
    }

    Ok(keys
        .into_iter()
        .zip(results)
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}
