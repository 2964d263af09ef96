//! Author model, form and view

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{format_form_date, format_long_date};
use crate::{
    repository::{Document, Kind},
    validation::{self, FormInput},
};

pub(crate) static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid alphanumeric pattern"));

pub const NAME_MAX_LEN: usize = 100;

/// Stored author document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

impl Document for Author {
    const KIND: Kind = Kind::Authors;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Author {
    /// Build a new author with a fresh identifier
    pub fn new(input: AuthorInput) -> Self {
        Self::with_id(Uuid::new_v4(), input)
    }

    /// Build the replacement document for an existing author
    pub fn with_id(id: Uuid, input: AuthorInput) -> Self {
        Self {
            id,
            first_name: input.first_name,
            family_name: input.family_name,
            date_of_birth: input.date_of_birth,
            date_of_death: input.date_of_death,
        }
    }

    /// "family, first", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn view(&self) -> AuthorView {
        AuthorView {
            name: self.name(),
            url: self.url(),
            date_of_birth_formatted: self.date_of_birth.map(format_long_date).unwrap_or_default(),
            date_of_death_formatted: self.date_of_death.map(format_long_date).unwrap_or_default(),
            date_of_birth_update: self.date_of_birth.map(format_form_date).unwrap_or_default(),
            date_of_death_update: self.date_of_death.map(format_form_date).unwrap_or_default(),
            author: self.clone(),
        }
    }
}

/// Author with the derived attributes views need
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub url: String,
    pub date_of_birth_formatted: String,
    pub date_of_death_formatted: String,
    pub date_of_birth_update: String,
    pub date_of_death_update: String,
}

/// Create/update author form body
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorForm {
    #[validate(
        length(min = 1, message = "First name must be specified."),
        regex(path = *ALPHANUMERIC, message = "First name has non-alphanumeric characters.")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        regex(path = *ALPHANUMERIC, message = "Family name has non-alphanumeric characters.")
    )]
    pub family_name: String,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
}

/// Sanitized author fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AuthorInput {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl FormInput for AuthorForm {
    type Output = AuthorInput;

    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn normalize(&mut self) {
        self.first_name = self.first_name.trim().to_string();
        self.family_name = self.family_name.trim().to_string();
        self.date_of_birth = validation::falsy_to_none(self.date_of_birth.take());
        self.date_of_death = validation::falsy_to_none(self.date_of_death.take());
    }

    fn check(&self, errors: &mut ValidationErrors) {
        if self.first_name.chars().count() > NAME_MAX_LEN {
            validation::add_error(errors, "first_name", "length", "First name must be at most 100 characters.");
        }
        if self.family_name.chars().count() > NAME_MAX_LEN {
            validation::add_error(errors, "family_name", "length", "Family name must be at most 100 characters.");
        }
        validation::check_optional_date(
            errors,
            "date_of_birth",
            self.date_of_birth.as_deref(),
            "Invalid date of birth",
        );
        validation::check_optional_date(
            errors,
            "date_of_death",
            self.date_of_death.as_deref(),
            "Invalid date of death",
        );
    }

    fn sanitize(&self) -> AuthorInput {
        AuthorInput {
            first_name: validation::escape(&self.first_name),
            family_name: validation::escape(&self.family_name),
            date_of_birth: validation::to_date(self.date_of_birth.as_deref()),
            date_of_death: validation::to_date(self.date_of_death.as_deref()),
        }
    }
}

impl From<&AuthorInput> for AuthorForm {
    fn from(input: &AuthorInput) -> Self {
        Self {
            first_name: input.first_name.clone(),
            family_name: input.family_name.clone(),
            date_of_birth: input.date_of_birth.map(format_form_date),
            date_of_death: input.date_of_death.map(format_form_date),
        }
    }
}
