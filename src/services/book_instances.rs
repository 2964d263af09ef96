//! Book instance (copy) service

use std::collections::HashMap;

use uuid::Uuid;

use super::{fetch::fetch_pair, DeleteOutcome, FormOutcome};
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceForm, BookInstanceInput, BookInstanceView, BookSummary},
    repository::{Query, Repository},
    validation::{self, Submission},
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book titles for the selection control of the copy form
    pub async fn book_options(&self) -> AppResult<Vec<BookSummary>> {
        let books = self
            .repository
            .books
            .find_as::<BookSummary>(Query::all().project(&["title"]).sort_by("title"))
            .await?;
        Ok(books.into_iter().map(BookSummary::with_url).collect())
    }

    /// All copies joined with their book, by book title then imprint
    pub async fn list(&self) -> AppResult<Vec<BookInstanceView>> {
        let (copies, books) = fetch_pair(
            self.repository.book_instances.find(Query::all()),
            self.book_options(),
        )
        .await?;

        let books: HashMap<Uuid, BookSummary> = books.into_iter().map(|b| (b.id, b)).collect();
        let mut views: Vec<BookInstanceView> = copies
            .iter()
            .map(|copy| copy.view(books.get(&copy.book).cloned()))
            .collect();
        views.sort_by(|a, b| {
            let title = |v: &BookInstanceView| v.book.as_ref().map(|b| b.title.clone()).unwrap_or_default();
            title(a).cmp(&title(b)).then_with(|| a.imprint.cmp(&b.imprint))
        });
        Ok(views)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository
            .book_instances
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    async fn find_view(&self, id: Uuid) -> AppResult<Option<BookInstanceView>> {
        let Some(copy) = self.repository.book_instances.find_by_id(id).await? else {
            return Ok(None);
        };
        let book = self
            .repository
            .books
            .find_by_id(copy.book)
            .await?
            .map(|book| BookSummary::from(&book));
        Ok(Some(copy.view(book)))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstanceView> {
        self.find_view(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    /// Copy plus the book choices, read concurrently, for the update form
    pub async fn edit(&self, id: Uuid) -> AppResult<(BookInstance, Vec<BookSummary>)> {
        fetch_pair(self.get(id), self.book_options()).await
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<BookInstanceView>> {
        self.find_view(id).await
    }

    /// Run the form pipeline, then require the referenced book to exist
    async fn validate(&self, form: BookInstanceForm) -> AppResult<Submission<BookInstanceInput>> {
        let mut submission = validation::process(form);
        if let Some(book) = submission.value.book {
            if self.repository.books.find_by_id(book).await?.is_none() {
                submission.reject("book", "Book not found");
            }
        }
        Ok(submission)
    }

    pub async fn create(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstance, BookInstanceInput>> {
        let submission = self.validate(form).await?;
        let copy = match submission.is_valid() {
            true => submission.value.clone().into_copy(Uuid::new_v4()),
            false => None,
        };
        let Some(copy) = copy else {
            return Ok(FormOutcome::Rejected(submission));
        };

        self.repository.book_instances.insert(&copy).await?;
        tracing::info!("Created copy {} of book {}", copy.id, copy.book);
        Ok(FormOutcome::Saved(copy))
    }

    pub async fn update(
        &self,
        id: Uuid,
        form: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstance, BookInstanceInput>> {
        let submission = self.validate(form).await?;
        let copy = match submission.is_valid() {
            true => submission.value.clone().into_copy(id),
            false => None,
        };
        let Some(copy) = copy else {
            return Ok(FormOutcome::Rejected(submission));
        };

        if !self.repository.book_instances.update(&copy).await? {
            return Err(AppError::NotFound("Book copy not found".to_string()));
        }
        tracing::info!("Updated copy {}", copy.id);
        Ok(FormOutcome::Saved(copy))
    }

    /// Copies have no dependents, so removal is unconditional
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<()>> {
        if self.repository.book_instances.remove_by_id(id).await? {
            tracing::info!("Deleted copy {}", id);
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::Missing)
        }
    }
}
