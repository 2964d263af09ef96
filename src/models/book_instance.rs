//! Book instance (physical copy) model, form and view

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{format_form_date, format_long_date, BookSummary};
use crate::{
    repository::{Document, Kind},
    validation::{self, FormInput},
};

/// Availability of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum CopyStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl CopyStatus {
    pub const ALL: [CopyStatus; 4] = [
        CopyStatus::Available,
        CopyStatus::Maintenance,
        CopyStatus::Loaned,
        CopyStatus::Reserved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CopyStatus::Available => "Available",
            CopyStatus::Maintenance => "Maintenance",
            CopyStatus::Loaned => "Loaned",
            CopyStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CopyStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// Stored copy document; `book` holds the book identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    #[serde(default)]
    pub status: CopyStatus,
    #[serde(default)]
    pub due_back: Option<NaiveDate>,
}

impl Document for BookInstance {
    const KIND: Kind = Kind::BookInstances;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    /// Copy joined with its book, `None` when the book no longer exists
    pub fn view(&self, book: Option<BookSummary>) -> BookInstanceView {
        BookInstanceView {
            id: self.id,
            imprint: self.imprint.clone(),
            status: self.status,
            due_back: self.due_back,
            url: self.url(),
            due_back_formatted: self.due_back.map(format_long_date).unwrap_or_default(),
            due_back_update: self.due_back.map(format_form_date).unwrap_or_default(),
            book: book.map(|b| b.with_url()),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub imprint: String,
    pub status: CopyStatus,
    pub due_back: Option<NaiveDate>,
    pub url: String,
    pub due_back_formatted: String,
    pub due_back_update: String,
    pub book: Option<BookSummary>,
}

/// Create/update copy form body
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct BookInstanceForm {
    #[validate(length(min = 1, message = "Book must be specified"))]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    pub status: String,
    pub due_back: Option<String>,
}

/// Sanitized copy fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BookInstanceInput {
    pub book: Option<Uuid>,
    pub imprint: String,
    pub status: Option<CopyStatus>,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceInput {
    pub fn into_copy(self, id: Uuid) -> Option<BookInstance> {
        Some(BookInstance {
            id,
            book: self.book?,
            imprint: self.imprint,
            status: self.status?,
            due_back: self.due_back,
        })
    }
}

impl FormInput for BookInstanceForm {
    type Output = BookInstanceInput;

    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn normalize(&mut self) {
        self.book = self.book.trim().to_string();
        self.imprint = self.imprint.trim().to_string();
        self.status = self.status.trim().to_string();
        self.due_back = validation::falsy_to_none(self.due_back.take());
    }

    fn check(&self, errors: &mut ValidationErrors) {
        if !self.book.is_empty() && Uuid::parse_str(&self.book).is_err() {
            validation::add_error(errors, "book", "reference", "Invalid book");
        }
        if !self.status.is_empty() && self.status.parse::<CopyStatus>().is_err() {
            validation::add_error(errors, "status", "enum", "Invalid status");
        }
        validation::check_optional_date(errors, "due_back", self.due_back.as_deref(), "Invalid date");
    }

    fn sanitize(&self) -> BookInstanceInput {
        let status = if self.status.is_empty() {
            Some(CopyStatus::default())
        } else {
            self.status.parse().ok()
        };
        BookInstanceInput {
            book: Uuid::parse_str(&self.book).ok(),
            imprint: validation::escape(&self.imprint),
            status,
            due_back: validation::to_date(self.due_back.as_deref()),
        }
    }
}
