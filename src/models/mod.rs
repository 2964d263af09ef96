//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::{Datelike, NaiveDate};

// Re-export commonly used types
pub use author::{Author, AuthorForm, AuthorInput, AuthorView};
pub use book::{Book, BookForm, BookInput, BookSummary, BookView};
pub use book_instance::{BookInstance, BookInstanceForm, BookInstanceInput, BookInstanceView, CopyStatus};
pub use genre::{Genre, GenreForm, GenreInput, GenreView};

/// Display format, e.g. "December 16th, 1775"
pub fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%B"), day, suffix, date.year())
}

/// Form pre-fill format, e.g. "1775-12-16"
pub fn format_form_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
