//! Book service

use std::collections::HashMap;

use uuid::Uuid;

use super::{
    fetch::{fetch_all, fetch_pair},
    DeleteOutcome, FormOutcome,
};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookForm, BookInput, BookInstance, BookInstanceView, BookSummary, BookView, Genre},
    repository::{Query, Repository},
    validation::{self, Submission},
};

/// A book with its references resolved and its copies
#[derive(Debug, Clone)]
pub struct BookWithCopies {
    pub book: BookView,
    pub copies: Vec<BookInstanceView>,
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books by title, authors and genres resolved
    pub async fn list(&self) -> AppResult<Vec<BookView>> {
        let (books, (authors, genres)) = fetch_pair(
            self.repository.books.find(Query::all().sort_by("title")),
            fetch_pair(
                self.repository.authors.find(Query::all()),
                self.repository.genres.find(Query::all()),
            ),
        )
        .await?;

        let authors: HashMap<Uuid, Author> = authors.into_iter().map(|a| (a.id, a)).collect();
        let genres: HashMap<Uuid, Genre> = genres.into_iter().map(|g| (g.id, g)).collect();

        Ok(books
            .iter()
            .map(|book| {
                BookView::new(
                    book,
                    authors.get(&book.author).map(Author::view),
                    book.genre.iter().filter_map(|id| genres.get(id)).map(Genre::view).collect(),
                )
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Resolve the author and every genre of one book concurrently
    async fn resolve(&self, book: &Book) -> AppResult<BookView> {
        let genre_reads = book
            .genre
            .iter()
            .map(|id| {
                let genres = self.repository.genres.clone();
                let id = *id;
                (id, async move { genres.find_by_id(id).await })
            })
            .collect();

        let (author, genres) = fetch_pair(
            self.repository.authors.find_by_id(book.author),
            fetch_all(genre_reads),
        )
        .await?;

        Ok(BookView::new(
            book,
            author.as_ref().map(Author::view),
            genres.values().flatten().map(Genre::view).collect(),
        ))
    }

    async fn fetch_with_copies(&self, id: Uuid) -> AppResult<Option<BookWithCopies>> {
        let (book, copies) = fetch_pair(
            self.repository.books.find_by_id(id),
            self.repository
                .book_instances
                .find(Query::all().matching("book", id.to_string()).sort_by("imprint")),
        )
        .await?;

        let Some(book) = book else {
            return Ok(None);
        };
        let summary = BookSummary::from(&book);
        let copies = copies
            .iter()
            .map(|copy: &BookInstance| copy.view(Some(summary.clone())))
            .collect();
        Ok(Some(BookWithCopies {
            book: self.resolve(&book).await?,
            copies,
        }))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookWithCopies> {
        self.fetch_with_copies(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<BookWithCopies>> {
        self.fetch_with_copies(id).await
    }

    /// Author and genre choices for the book form
    pub async fn form_options(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        fetch_pair(
            self.repository.authors.find(Query::all().sort_by("family_name")),
            self.repository.genres.find(Query::all().sort_by("name")),
        )
        .await
    }

    /// Book plus the form choices, read concurrently, for the update form
    pub async fn edit(&self, id: Uuid) -> AppResult<(Book, Vec<Author>, Vec<Genre>)> {
        let (book, (authors, genres)) = fetch_pair(self.get(id), self.form_options()).await?;
        Ok((book, authors, genres))
    }

    /// Run the form pipeline, then require the referenced author to exist
    async fn validate(&self, form: BookForm) -> AppResult<Submission<BookInput>> {
        let mut submission = validation::process(form);
        if let Some(author) = submission.value.author {
            if self.repository.authors.find_by_id(author).await?.is_none() {
                submission.reject("author", "Author not found");
            }
        }
        Ok(submission)
    }

    pub async fn create(&self, form: BookForm) -> AppResult<FormOutcome<Book, BookInput>> {
        let submission = self.validate(form).await?;
        let book = match submission.is_valid() {
            true => submission.value.clone().into_book(Uuid::new_v4()),
            false => None,
        };
        let Some(book) = book else {
            return Ok(FormOutcome::Rejected(submission));
        };

        self.repository.books.insert(&book).await?;
        tracing::info!("Created book {} ({})", book.title, book.id);
        Ok(FormOutcome::Saved(book))
    }

    pub async fn update(&self, id: Uuid, form: BookForm) -> AppResult<FormOutcome<Book, BookInput>> {
        let submission = self.validate(form).await?;
        let book = match submission.is_valid() {
            true => submission.value.clone().into_book(id),
            false => None,
        };
        let Some(book) = book else {
            return Ok(FormOutcome::Rejected(submission));
        };

        if !self.repository.books.update(&book).await? {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        tracing::info!("Updated book {}", book.id);
        Ok(FormOutcome::Saved(book))
    }

    /// Remove the book unless copies of it still exist
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<BookWithCopies>> {
        let Some(current) = self.fetch_with_copies(id).await? else {
            return Ok(DeleteOutcome::Missing);
        };
        if !current.copies.is_empty() {
            tracing::warn!(
                "Refusing to delete book {}: {} cop(ies) reference it",
                id,
                current.copies.len()
            );
            return Ok(DeleteOutcome::Blocked(current));
        }

        self.repository.books.remove_by_id(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(DeleteOutcome::Deleted)
    }
}
