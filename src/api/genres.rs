//! Genre pages

use axum::extract::State;
use axum_extra::extract::{Form, WithRejection};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::{check_delete_target, Page, RecordId, View};
use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreForm, GenreView},
    services::{genres::GenreWithBooks, DeleteOutcome, FormOutcome},
    AppState,
};

const LIST_URL: &str = "/catalog/genres";

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct GenreDeleteForm {
    pub genreid: String,
}

fn delete_view(current: GenreWithBooks) -> View {
    View::new(
        "genre_delete",
        json!({
            "title": "Delete Genre",
            "genre": current.genre.view(),
            "genre_books": current.books,
        }),
    )
}

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses((status = 200, description = "genre_list view", body = Vec<GenreView>))
)]
pub async fn genre_list(State(state): State<AppState>) -> AppResult<View> {
    let genres: Vec<GenreView> = state
        .services
        .genres
        .list()
        .await?
        .iter()
        .map(Genre::view)
        .collect();
    Ok(View::new("genre_list", json!({ "title": "Genres", "genres": genres })))
}

/// Show one genre and the books filed under it
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = uuid::Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "genre_detail view"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_detail(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<View> {
    let id = id.or_not_found("Genre")?;
    let GenreWithBooks { genre, books } = state.services.genres.detail(id).await?;
    Ok(View::new(
        "genre_detail",
        json!({
            "title": "Genre Details",
            "genre": genre.view(),
            "genre_books": books,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses((status = 200, description = "genre_form view"))
)]
pub async fn genre_create_get() -> View {
    View::new("genre_form", json!({ "title": "Create Genre" }))
}

/// Create a genre; an existing name redirects to the stored genre
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body(content = GenreForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created or already present; redirect to the genre"),
        (status = 200, description = "genre_form view with errors")
    )
)]
pub async fn genre_create_post(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<GenreForm>, AppError>,
) -> AppResult<Page> {
    match state.services.genres.create(form).await? {
        FormOutcome::Saved(genre) => Ok(Page::redirect(genre.url())),
        FormOutcome::Rejected(submission) => Ok(View::new(
            "genre_form",
            json!({
                "title": "Create Genre",
                "genre": submission.value,
                "errors": submission.errors,
            }),
        )
        .into()),
    }
}

#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = uuid::Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "genre_form view"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_update_get(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<View> {
    let id = id.or_not_found("Genre")?;
    let genre = state.services.genres.get(id).await?;
    Ok(View::new(
        "genre_form",
        json!({ "title": "Update Genre", "genre": genre.view() }),
    ))
}

/// Rename a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = uuid::Uuid, Path, description = "Genre ID")),
    request_body(content = GenreForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirect to the genre"),
        (status = 200, description = "genre_form view with errors"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_update_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<GenreForm>, AppError>,
) -> AppResult<Page> {
    let id = id.or_not_found("Genre")?;
    match state.services.genres.update(id, form).await? {
        FormOutcome::Saved(genre) => Ok(Page::redirect(genre.url())),
        FormOutcome::Rejected(submission) => Ok(View::new(
            "genre_form",
            json!({
                "title": "Update Genre",
                "genre": submission.value,
                "errors": submission.errors,
            }),
        )
        .into()),
    }
}

#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = uuid::Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "genre_delete view"),
        (status = 303, description = "No such genre; redirect to the list")
    )
)]
pub async fn genre_delete_get(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    match state.services.genres.delete_preview(id).await? {
        Some(current) => Ok(delete_view(current).into()),
        None => Ok(Page::redirect(LIST_URL)),
    }
}

/// Delete a genre no book is filed under
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = uuid::Uuid, Path, description = "Genre ID")),
    request_body(content = GenreDeleteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 200, description = "genre_delete view listing the blocking books"),
        (status = 400, description = "Form target differs from the path", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_delete_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<GenreDeleteForm>, AppError>,
) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    check_delete_target(&form.genreid, id)?;
    match state.services.genres.delete(id).await? {
        DeleteOutcome::Blocked(current) => Ok(delete_view(current).into()),
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(Page::redirect(LIST_URL)),
    }
}
