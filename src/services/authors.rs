//! Author service

use uuid::Uuid;

use super::{fetch::fetch_pair, DeleteOutcome, FormOutcome};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, AuthorInput, BookSummary},
    repository::{Query, Repository},
    validation,
};

/// An author together with the books that reference it
#[derive(Debug, Clone)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository
            .authors
            .find(Query::all().sort_by("family_name"))
            .await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.repository
            .authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Author plus its books, both read concurrently
    async fn fetch_with_books(&self, id: Uuid) -> AppResult<Option<AuthorWithBooks>> {
        let books_query = Query::all()
            .matching("author", id.to_string())
            .project(&["title", "summary"])
            .sort_by("title");

        let (author, books) = fetch_pair(
            self.repository.authors.find_by_id(id),
            self.repository.books.find_as::<BookSummary>(books_query),
        )
        .await?;

        Ok(author.map(|author| AuthorWithBooks {
            author,
            books: books.into_iter().map(BookSummary::with_url).collect(),
        }))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorWithBooks> {
        self.fetch_with_books(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// What the delete confirmation page shows; `None` when the author is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<AuthorWithBooks>> {
        self.fetch_with_books(id).await
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<FormOutcome<Author, AuthorInput>> {
        let submission = validation::process(form);
        if !submission.is_valid() {
            tracing::debug!("Author submission rejected: {} error(s)", submission.errors.len());
            return Ok(FormOutcome::Rejected(submission));
        }

        let author = Author::new(submission.value);
        self.repository.authors.insert(&author).await?;
        tracing::info!("Created author {} ({})", author.name(), author.id);
        Ok(FormOutcome::Saved(author))
    }

    pub async fn update(
        &self,
        id: Uuid,
        form: AuthorForm,
    ) -> AppResult<FormOutcome<Author, AuthorInput>> {
        let submission = validation::process(form);
        if !submission.is_valid() {
            return Ok(FormOutcome::Rejected(submission));
        }

        let author = Author::with_id(id, submission.value);
        if !self.repository.authors.update(&author).await? {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        tracing::info!("Updated author {}", author.id);
        Ok(FormOutcome::Saved(author))
    }

    /// Remove the author unless books still reference it.
    ///
    /// Dependents are read again here rather than trusted from the
    /// confirmation page.
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<AuthorWithBooks>> {
        let Some(current) = self.fetch_with_books(id).await? else {
            return Ok(DeleteOutcome::Missing);
        };
        if !current.books.is_empty() {
            tracing::warn!(
                "Refusing to delete author {}: {} book(s) reference it",
                id,
                current.books.len()
            );
            return Ok(DeleteOutcome::Blocked(current));
        }

        self.repository.authors.remove_by_id(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(DeleteOutcome::Deleted)
    }
}
