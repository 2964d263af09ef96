//! Genre model, form and view

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    repository::{Document, Kind},
    validation::{self, FormInput},
};

pub const NAME_MAX_LEN: usize = 100;

/// Stored genre document; `name` is unique across genres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Document for Genre {
    const KIND: Kind = Kind::Genres;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }

    pub fn view(&self) -> GenreView {
        GenreView {
            genre: self.clone(),
            url: self.url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

/// Create/update genre form body
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GenreForm {
    #[validate(length(min = 1, message = "Genre name required"))]
    pub name: String,
}

/// Sanitized genre fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct GenreInput {
    pub name: String,
}

impl FormInput for GenreForm {
    type Output = GenreInput;

    const FIELDS: &'static [&'static str] = &["name"];

    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
    }

    fn check(&self, errors: &mut ValidationErrors) {
        if self.name.chars().count() > NAME_MAX_LEN {
            validation::add_error(errors, "name", "length", "Genre name must be at most 100 characters.");
        }
    }

    fn sanitize(&self) -> GenreInput {
        GenreInput {
            name: validation::escape(&self.name),
        }
    }
}
