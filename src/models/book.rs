//! Book model, form and views

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{AuthorView, GenreView};
use crate::{
    repository::{Document, Kind},
    validation::{self, FormInput},
};

/// Stored book document; `author` and `genre` hold identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<Uuid>,
}

impl Document for Book {
    const KIND: Kind = Kind::Books;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

/// Title/summary projection used for dependent lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
}

impl BookSummary {
    /// Fill the derived URL after decoding a projection
    pub fn with_url(mut self) -> Self {
        self.url = book_url(self.id);
        self
    }
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            url: book.url(),
        }
    }
}

/// Book with its references resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: Option<AuthorView>,
    pub genre: Vec<GenreView>,
}

impl BookView {
    pub fn new(book: &Book, author: Option<AuthorView>, genre: Vec<GenreView>) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            url: book.url(),
            author,
            genre,
        }
    }
}

/// Create/update book form body; `genre` may repeat
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    pub genre: Vec<String>,
}

/// Sanitized book fields; unparseable references are dropped
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BookInput {
    pub title: String,
    pub author: Option<Uuid>,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl BookInput {
    /// The book document, once the author reference is known
    pub fn into_book(self, id: Uuid) -> Option<Book> {
        Some(Book {
            id,
            author: self.author?,
            title: self.title,
            summary: self.summary,
            isbn: self.isbn,
            genre: self.genre,
        })
    }
}

impl FormInput for BookForm {
    type Output = BookInput;

    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        self.summary = self.summary.trim().to_string();
        self.isbn = self.isbn.trim().to_string();
        // A genre ticked twice, in any spelling of its id, is kept once
        let mut seen = HashSet::new();
        self.genre = std::mem::take(&mut self.genre)
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .filter(|g| {
                let key = Uuid::parse_str(g).map_or_else(|_| g.clone(), |id| id.to_string());
                seen.insert(key)
            })
            .collect();
    }

    fn check(&self, errors: &mut ValidationErrors) {
        if !self.author.is_empty() && Uuid::parse_str(&self.author).is_err() {
            validation::add_error(errors, "author", "reference", "Invalid author");
        }
        if self.genre.iter().any(|g| Uuid::parse_str(g).is_err()) {
            validation::add_error(errors, "genre", "reference", "Invalid genre");
        }
    }

    fn sanitize(&self) -> BookInput {
        BookInput {
            title: validation::escape(&self.title),
            author: Uuid::parse_str(&self.author).ok(),
            summary: validation::escape(&self.summary),
            isbn: validation::escape(&self.isbn),
            genre: self
                .genre
                .iter()
                .filter_map(|g| Uuid::parse_str(g).ok())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{process, FieldError};

    #[test]
    fn test_required_fields() {
        let submission = process(BookForm::default());
        let fields: Vec<_> = submission.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "author", "summary", "isbn"]);
    }

    #[test]
    fn test_references_parsed() {
        let author = Uuid::new_v4();
        let genre = Uuid::new_v4();
        let submission = process(BookForm {
            title: "Emma".into(),
            author: author.to_string(),
            summary: "A novel".into(),
            isbn: "9780141439587".into(),
            genre: vec![genre.to_string(), "".into()],
        });
        assert!(submission.is_valid());
        assert_eq!(submission.value.author, Some(author));
        assert_eq!(submission.value.genre, vec![genre]);

        let book = submission.value.into_book(Uuid::new_v4()).unwrap();
        assert_eq!(book.author, author);
    }

    #[test]
    fn test_repeated_genres_kept_once_in_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let submission = process(BookForm {
            title: "Emma".into(),
            author: Uuid::new_v4().to_string(),
            summary: "A novel".into(),
            isbn: "9780141439587".into(),
            genre: vec![
                second.to_string(),
                first.to_string(),
                second.to_string().to_uppercase(),
                format!(" {} ", first),
            ],
        });
        assert!(submission.is_valid());
        assert_eq!(submission.value.genre, vec![second, first]);
    }

    #[test]
    fn test_bad_references_rejected() {
        let submission = process(BookForm {
            title: "Emma".into(),
            author: "austen".into(),
            summary: "A novel".into(),
            isbn: "1".into(),
            genre: vec!["romance".into()],
        });
        assert_eq!(
            submission.errors,
            vec![
                FieldError::new("author", "Invalid author"),
                FieldError::new("genre", "Invalid genre"),
            ]
        );
        assert!(submission.value.into_book(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_projection_url() {
        let id = Uuid::new_v4();
        let summary = BookSummary {
            id,
            title: "Emma".into(),
            summary: String::new(),
            url: String::new(),
        }
        .with_url();
        assert_eq!(summary.url, format!("/catalog/book/{}", id));
    }
}
