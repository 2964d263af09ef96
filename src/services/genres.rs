//! Genre service

use uuid::Uuid;

use super::{fetch::fetch_pair, DeleteOutcome, FormOutcome};
use crate::{
    error::{AppError, AppResult},
    models::{BookSummary, Genre, GenreForm, GenreInput},
    repository::{Query, Repository},
    validation,
};

/// A genre together with the books filed under it
#[derive(Debug, Clone)]
pub struct GenreWithBooks {
    pub genre: Genre,
    pub books: Vec<BookSummary>,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.find(Query::all().sort_by("name")).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Genre> {
        self.repository
            .genres
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let found = self
            .repository
            .genres
            .find(Query::all().matching("name", name))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn fetch_with_books(&self, id: Uuid) -> AppResult<Option<GenreWithBooks>> {
        let books_query = Query::all()
            .matching("genre", id.to_string())
            .project(&["title", "summary"])
            .sort_by("title");

        let (genre, books) = fetch_pair(
            self.repository.genres.find_by_id(id),
            self.repository.books.find_as::<BookSummary>(books_query),
        )
        .await?;

        Ok(genre.map(|genre| GenreWithBooks {
            genre,
            books: books.into_iter().map(BookSummary::with_url).collect(),
        }))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<GenreWithBooks> {
        self.fetch_with_books(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<GenreWithBooks>> {
        self.fetch_with_books(id).await
    }

    /// Create a genre, or hand back the one that already has this name
    pub async fn create(&self, form: GenreForm) -> AppResult<FormOutcome<Genre, GenreInput>> {
        let submission = validation::process(form);
        if !submission.is_valid() {
            return Ok(FormOutcome::Rejected(submission));
        }

        if let Some(existing) = self.find_by_name(&submission.value.name).await? {
            tracing::debug!("Genre {} already exists as {}", existing.name, existing.id);
            return Ok(FormOutcome::Saved(existing));
        }

        let genre = Genre::new(submission.value.name);
        match self.repository.genres.insert(&genre).await {
            Ok(()) => {
                tracing::info!("Created genre {} ({})", genre.name, genre.id);
                Ok(FormOutcome::Saved(genre))
            }
            // Lost a race against a concurrent insert of the same name
            Err(AppError::Conflict(_)) => {
                tracing::warn!("Concurrent insert of genre {}; using the stored one", genre.name);
                self.find_by_name(&genre.name)
                    .await?
                    .map(FormOutcome::Saved)
                    .ok_or_else(|| AppError::Conflict(format!("Genre {} already exists", genre.name)))
            }
            Err(e) => Err(e),
        }
    }

    /// Rename a genre; a name held by another genre is a form error
    pub async fn update(&self, id: Uuid, form: GenreForm) -> AppResult<FormOutcome<Genre, GenreInput>> {
        let mut submission = validation::process(form);
        if !submission.is_valid() {
            return Ok(FormOutcome::Rejected(submission));
        }

        if let Some(existing) = self.find_by_name(&submission.value.name).await? {
            if existing.id != id {
                submission.reject("name", "Genre name already in use");
                return Ok(FormOutcome::Rejected(submission));
            }
        }

        let genre = Genre {
            id,
            name: submission.value.name.clone(),
        };
        match self.repository.genres.update(&genre).await {
            Ok(true) => {
                tracing::info!("Updated genre {}", genre.id);
                Ok(FormOutcome::Saved(genre))
            }
            Ok(false) => Err(AppError::NotFound("Genre not found".to_string())),
            Err(AppError::Conflict(_)) => {
                submission.reject("name", "Genre name already in use");
                Ok(FormOutcome::Rejected(submission))
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the genre unless books are still filed under it
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<GenreWithBooks>> {
        let Some(current) = self.fetch_with_books(id).await? else {
            return Ok(DeleteOutcome::Missing);
        };
        if !current.books.is_empty() {
            tracing::warn!(
                "Refusing to delete genre {}: {} book(s) reference it",
                id,
                current.books.len()
            );
            return Ok(DeleteOutcome::Blocked(current));
        }

        self.repository.genres.remove_by_id(id).await?;
        tracing::info!("Deleted genre {}", id);
        Ok(DeleteOutcome::Deleted)
    }
}
