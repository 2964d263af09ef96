//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;
pub mod view;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub use view::{Page, View};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// A delete form may name its target; when it does, it must be the path id
pub(crate) fn check_delete_target(field: &str, id: Uuid) -> AppResult<()> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(());
    }
    match Uuid::parse_str(field) {
        Ok(target) if target == id => Ok(()),
        _ => Err(AppError::BadRequest(format!(
            "Delete target {} does not match {}",
            field, id
        ))),
    }
}

/// Record id taken from the path. Text that does not parse as an id names
/// no record, so handlers treat it the way they treat an unknown id.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub Option<Uuid>);

impl RecordId {
    pub fn or_not_found(self, what: &str) -> AppResult<Uuid> {
        self.0
            .ok_or_else(|| AppError::NotFound(format!("{} not found", what)))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(Uuid::parse_str(raw.trim()).ok()))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(catalog::root))
        .route("/catalog", get(catalog::index))
        // Authors
        .route("/catalog/authors", get(authors::author_list))
        .route(
            "/catalog/author/create",
            get(authors::author_create_get).post(authors::author_create_post),
        )
        .route("/catalog/author/:id", get(authors::author_detail))
        .route(
            "/catalog/author/:id/update",
            get(authors::author_update_get).post(authors::author_update_post),
        )
        .route(
            "/catalog/author/:id/delete",
            get(authors::author_delete_get).post(authors::author_delete_post),
        )
        // Genres
        .route("/catalog/genres", get(genres::genre_list))
        .route(
            "/catalog/genre/create",
            get(genres::genre_create_get).post(genres::genre_create_post),
        )
        .route("/catalog/genre/:id", get(genres::genre_detail))
        .route(
            "/catalog/genre/:id/update",
            get(genres::genre_update_get).post(genres::genre_update_post),
        )
        .route(
            "/catalog/genre/:id/delete",
            get(genres::genre_delete_get).post(genres::genre_delete_post),
        )
        // Books
        .route("/catalog/books", get(books::book_list))
        .route(
            "/catalog/book/create",
            get(books::book_create_get).post(books::book_create_post),
        )
        .route("/catalog/book/:id", get(books::book_detail))
        .route(
            "/catalog/book/:id/update",
            get(books::book_update_get).post(books::book_update_post),
        )
        .route(
            "/catalog/book/:id/delete",
            get(books::book_delete_get).post(books::book_delete_post),
        )
        // Copies
        .route("/catalog/bookinstances", get(book_instances::bookinstance_list))
        .route(
            "/catalog/bookinstance/create",
            get(book_instances::bookinstance_create_get).post(book_instances::bookinstance_create_post),
        )
        .route("/catalog/bookinstance/:id", get(book_instances::bookinstance_detail))
        .route(
            "/catalog/bookinstance/:id/update",
            get(book_instances::bookinstance_update_get).post(book_instances::bookinstance_update_post),
        )
        .route(
            "/catalog/bookinstance/:id/delete",
            get(book_instances::bookinstance_delete_get).post(book_instances::bookinstance_delete_post),
        )
        .with_state(state.clone());

    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    Router::new()
        .merge(catalog)
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
