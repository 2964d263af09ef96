//! Repository layer: document collections over a pluggable store

pub mod collection;
pub mod memory;
pub mod postgres;

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookInstance, Genre},
};

pub use collection::{Collection, Document};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// The catalog collections; each maps to its own table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Authors,
    Genres,
    Books,
    BookInstances,
}

impl Kind {
    pub fn table(self) -> &'static str {
        match self {
            Kind::Authors => "authors",
            Kind::Genres => "genres",
            Kind::Books => "books",
            Kind::BookInstances => "book_instances",
        }
    }

    /// Fields whose values must be distinct across the collection
    pub fn unique_fields(self) -> &'static [&'static str] {
        match self {
            Kind::Genres => &["name"],
            _ => &[],
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Find query: field filter, optional projection and ascending sort key.
///
/// A filter value matches a scalar field when equal, and an array field
/// when it is one of the array's elements.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filter: Map<String, Value>,
    pub projection: Option<Vec<&'static str>>,
    pub sort: Option<&'static str>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matching(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_string(), value.into());
        self
    }

    pub fn project(mut self, fields: &[&'static str]) -> Self {
        self.projection = Some(fields.to_vec());
        self
    }

    pub fn sort_by(mut self, field: &'static str) -> Self {
        self.sort = Some(field);
        self
    }
}

/// Primitive document operations every backend provides
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(&self, kind: Kind, id: Uuid) -> AppResult<Option<Value>>;

    async fn find(&self, kind: Kind, query: &Query) -> AppResult<Vec<Value>>;

    async fn count(&self, kind: Kind, filter: &Map<String, Value>) -> AppResult<i64>;

    /// Fails with `AppError::Conflict` when a unique field is already taken
    async fn insert(&self, kind: Kind, id: Uuid, doc: Value) -> AppResult<()>;

    /// Returns false when no document has this id
    async fn update_by_id(&self, kind: Kind, id: Uuid, doc: Value) -> AppResult<bool>;

    /// Returns false when no document has this id
    async fn remove_by_id(&self, kind: Kind, id: Uuid) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;
}

/// Keep only `id` and the projected fields of a document
pub(crate) fn project(doc: Value, fields: &[&str]) -> Value {
    match doc {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key == "id" || fields.contains(&key.as_str()))
                .collect(),
        ),
        other => other,
    }
}

/// Main repository struct holding one typed collection per entity
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn DocumentStore>,
    timeout: Duration,
    pub authors: Collection<Author>,
    pub genres: Collection<Genre>,
    pub books: Collection<Book>,
    pub book_instances: Collection<BookInstance>,
}

impl Repository {
    /// Create a repository over any document store
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self {
            authors: Collection::new(store.clone(), timeout),
            genres: Collection::new(store.clone(), timeout),
            books: Collection::new(store.clone(), timeout),
            book_instances: Collection::new(store.clone(), timeout),
            store,
            timeout,
        }
    }

    /// Round trip to the store, bounded like every collection call
    pub async fn ping(&self) -> AppResult<()> {
        tokio::time::timeout(self.timeout, self.store.ping())
            .await
            .map_err(|_| AppError::Timeout(format!("ping exceeded {:?}", self.timeout)))?
    }

    /// Create a repository backed by a Postgres pool
    pub fn postgres(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self::new(Arc::new(PgDocumentStore::new(pool)), timeout)
    }

    /// Create a repository backed by process memory
    pub fn in_memory(timeout: Duration) -> Self {
        Self::new(Arc::new(MemoryDocumentStore::default()), timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_keeps_id() {
        let doc = json!({"id": "x", "title": "Emma", "summary": "s", "isbn": "1"});
        let projected = project(doc, &["title"]);
        assert_eq!(projected, json!({"id": "x", "title": "Emma"}));
    }

    #[test]
    fn test_query_builder() {
        let query = Query::all()
            .matching("author", "a1")
            .project(&["title", "summary"])
            .sort_by("title");
        assert_eq!(query.filter.get("author"), Some(&json!("a1")));
        assert_eq!(query.projection, Some(vec!["title", "summary"]));
        assert_eq!(query.sort, Some("title"));
    }
}
