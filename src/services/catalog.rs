//! Catalog-wide figures for the home page

use std::{future::Future, pin::Pin};

use indexmap::IndexMap;

use super::fetch::fetch_all;
use crate::{
    error::AppResult,
    models::CopyStatus,
    repository::{Query, Repository},
};

type CountRead = Pin<Box<dyn Future<Output = AppResult<i64>> + Send>>;

fn boxed(read: impl Future<Output = AppResult<i64>> + Send + 'static) -> CountRead {
    Box::pin(read)
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record counts, all read concurrently, keyed by name
    pub async fn counts(&self) -> AppResult<IndexMap<&'static str, i64>> {
        let repo = &self.repository;
        let (books, copies, available, authors, genres) = (
            repo.books.clone(),
            repo.book_instances.clone(),
            repo.book_instances.clone(),
            repo.authors.clone(),
            repo.genres.clone(),
        );

        let reads: Vec<(&'static str, CountRead)> = vec![
            ("book_count", boxed(async move { books.count(Query::all()).await })),
            (
                "book_instance_count",
                boxed(async move { copies.count(Query::all()).await }),
            ),
            (
                "book_instance_available_count",
                boxed(async move {
                    available
                        .count(Query::all().matching("status", CopyStatus::Available.as_str()))
                        .await
                }),
            ),
            ("author_count", boxed(async move { authors.count(Query::all()).await })),
            ("genre_count", boxed(async move { genres.count(Query::all()).await })),
        ];

        let counts = fetch_all(reads).await?;
        tracing::debug!("Catalog counts: {:?}", counts);
        Ok(counts)
    }

    /// Round trip to the document store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
