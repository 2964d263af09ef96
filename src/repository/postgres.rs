//! Postgres document store: one JSONB table per collection

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{project, DocumentStore, Kind, Query};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Turn a unique-index violation into a conflict, keep anything else as is
fn map_write_error(kind: Kind, err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("Duplicate value in {}", kind))
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_by_id(&self, kind: Kind, id: Uuid) -> AppResult<Option<Value>> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", kind.table());
        let doc = sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc)
    }

    async fn find(&self, kind: Kind, query: &Query) -> AppResult<Vec<Value>> {
        let mut sql = format!("SELECT doc FROM {} WHERE doc @> $1", kind.table());
        if query.sort.is_some() {
            sql.push_str(r#" ORDER BY doc->>$2 COLLATE "C""#);
        }

        let mut builder =
            sqlx::query_scalar::<_, Value>(&sql).bind(Value::Object(query.filter.clone()));
        if let Some(key) = query.sort {
            builder = builder.bind(key);
        }

        let docs = builder.fetch_all(&self.pool).await?;
        Ok(match &query.projection {
            Some(fields) => docs.into_iter().map(|doc| project(doc, fields)).collect(),
            None => docs,
        })
    }

    async fn count(&self, kind: Kind, filter: &Map<String, Value>) -> AppResult<i64> {
        let sql = format!(
            "SELECT COUNT(*)::bigint FROM {} WHERE doc @> $1",
            kind.table()
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(Value::Object(filter.clone()))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, kind: Kind, id: Uuid, doc: Value) -> AppResult<()> {
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", kind.table());
        sqlx::query(&sql)
            .bind(id)
            .bind(doc)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(kind, e))?;
        Ok(())
    }

    async fn update_by_id(&self, kind: Kind, id: Uuid, doc: Value) -> AppResult<bool> {
        let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(doc)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(kind, e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_by_id(&self, kind: Kind, id: Uuid) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
