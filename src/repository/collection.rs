//! Typed view over one document collection

use std::{future::Future, marker::PhantomData, sync::Arc, time::Duration};

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::{DocumentStore, Kind, Query};
use crate::error::{AppError, AppResult};

/// A record stored as a document in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: Kind;

    fn id(&self) -> Uuid;
}

/// Typed access to the documents of `T::KIND`.
///
/// Every store call is bounded by the configured operation timeout.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            timeout: self.timeout,
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            _marker: PhantomData,
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<T>> {
        let doc = self
            .bounded("find_by_id", self.store.find_by_id(T::KIND, id))
            .await?;
        doc.map(serde_json::from_value::<T>).transpose().map_err(Into::into)
    }

    pub async fn find(&self, query: Query) -> AppResult<Vec<T>> {
        self.find_as(query).await
    }

    /// Find documents and decode them as `P`, typically a projection of `T`
    pub async fn find_as<P: DeserializeOwned>(&self, query: Query) -> AppResult<Vec<P>> {
        let docs = self.bounded("find", self.store.find(T::KIND, &query)).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub async fn count(&self, query: Query) -> AppResult<i64> {
        self.bounded("count", self.store.count(T::KIND, &query.filter))
            .await
    }

    pub async fn insert(&self, record: &T) -> AppResult<()> {
        let doc = serde_json::to_value(record)?;
        self.bounded("insert", self.store.insert(T::KIND, record.id(), doc))
            .await
    }

    /// Replace the stored document with the same id; false if it is gone
    pub async fn update(&self, record: &T) -> AppResult<bool> {
        let doc = serde_json::to_value(record)?;
        self.bounded("update_by_id", self.store.update_by_id(T::KIND, record.id(), doc))
            .await
    }

    pub async fn remove_by_id(&self, id: Uuid) -> AppResult<bool> {
        self.bounded("remove_by_id", self.store.remove_by_id(T::KIND, id))
            .await
    }

    async fn bounded<R>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<R>>,
    ) -> AppResult<R> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{} on {} exceeded {:?}",
                    operation,
                    T::KIND,
                    self.timeout
                ))
            })?
    }
}
