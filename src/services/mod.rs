//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod fetch;
pub mod genres;

use crate::{repository::Repository, validation::Submission};

/// Result of a create/update submission
#[derive(Debug)]
pub enum FormOutcome<T, I> {
    /// Persisted; the handler redirects to this record
    Saved(T),
    /// Not persisted; the form is shown again with the sanitized values and errors
    Rejected(Submission<I>),
}

/// Result of a delete submission
#[derive(Debug)]
pub enum DeleteOutcome<D> {
    Deleted,
    /// Dependent records still reference the target; nothing was removed
    Blocked(D),
    /// The target does not exist (any more)
    Missing,
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository),
        }
    }
}
