//! In-process document store

use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{project, DocumentStore, Kind, Query};
use crate::error::{AppError, AppResult};

/// Documents kept in insertion order per collection
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Kind, IndexMap<Uuid, Value>>>,
}

/// Scalar fields match by equality, array fields by membership
fn matches(doc: &Value, filter: &Map<String, Value>) -> bool {
    filter.iter().all(|(field, wanted)| match doc.get(field) {
        Some(Value::Array(items)) if !wanted.is_array() => items.contains(wanted),
        Some(value) => value == wanted,
        None => false,
    })
}

/// Ascending by the string value of `key`; documents without it go last
fn compare_by(key: &str, a: &Value, b: &Value) -> Ordering {
    match (a.get(key).and_then(Value::as_str), b.get(key).and_then(Value::as_str)) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn check_unique(
    kind: Kind,
    docs: Option<&IndexMap<Uuid, Value>>,
    id: Uuid,
    doc: &Value,
) -> AppResult<()> {
    let Some(docs) = docs else {
        return Ok(());
    };
    for field in kind.unique_fields() {
        let Some(value) = doc.get(*field) else {
            continue;
        };
        let taken = docs
            .iter()
            .any(|(other_id, other)| *other_id != id && other.get(*field) == Some(value));
        if taken {
            return Err(AppError::Conflict(format!(
                "Duplicate value in {} for field {}",
                kind, field
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_by_id(&self, kind: Kind, id: Uuid) -> AppResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&kind).and_then(|docs| docs.get(&id)).cloned())
    }

    async fn find(&self, kind: Kind, query: &Query) -> AppResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Value> = collections
            .get(&kind)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches(doc, &query.filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(key) = query.sort {
            found.sort_by(|a, b| compare_by(key, a, b));
        }
        if let Some(fields) = &query.projection {
            found = found.into_iter().map(|doc| project(doc, fields)).collect();
        }
        Ok(found)
    }

    async fn count(&self, kind: Kind, filter: &Map<String, Value>) -> AppResult<i64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(&kind)
            .map(|docs| docs.values().filter(|doc| matches(doc, filter)).count())
            .unwrap_or(0);
        Ok(count as i64)
    }

    async fn insert(&self, kind: Kind, id: Uuid, doc: Value) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        check_unique(kind, collections.get(&kind), id, &doc)?;
        let docs = collections.entry(kind).or_default();
        if docs.contains_key(&id) {
            return Err(AppError::Conflict(format!("Duplicate id {} in {}", id, kind)));
        }
        docs.insert(id, doc);
        Ok(())
    }

    async fn update_by_id(&self, kind: Kind, id: Uuid, doc: Value) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        check_unique(kind, collections.get(&kind), id, &doc)?;
        match collections.get_mut(&kind).and_then(|docs| docs.get_mut(&id)) {
            Some(slot) => {
                *slot = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_by_id(&self, kind: Kind, id: Uuid) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&kind)
            .and_then(|docs| docs.shift_remove(&id))
            .is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
