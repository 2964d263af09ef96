//! Author pages

use axum::extract::State;
use axum_extra::extract::{Form, WithRejection};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::{check_delete_target, Page, RecordId, View};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, AuthorView},
    services::{authors::AuthorWithBooks, DeleteOutcome, FormOutcome},
    AppState,
};

const LIST_URL: &str = "/catalog/authors";

/// Delete confirmation body
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct AuthorDeleteForm {
    pub authorid: String,
}

fn delete_view(current: AuthorWithBooks) -> View {
    View::new(
        "author_delete",
        json!({
            "title": "Delete Author",
            "author": current.author.view(),
            "author_books": current.books,
        }),
    )
}

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses((status = 200, description = "author_list view", body = Vec<AuthorView>))
)]
pub async fn author_list(State(state): State<AppState>) -> AppResult<View> {
    let authors: Vec<AuthorView> = state
        .services
        .authors
        .list()
        .await?
        .iter()
        .map(Author::view)
        .collect();
    Ok(View::new("author_list", json!({ "title": "Authors", "authors": authors })))
}

/// Show one author and their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = uuid::Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "author_detail view"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_detail(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<View> {
    let id = id.or_not_found("Author")?;
    let AuthorWithBooks { author, books } = state.services.authors.detail(id).await?;
    Ok(View::new(
        "author_detail",
        json!({
            "title": "Author Details",
            "author": author.view(),
            "author_books": books,
        }),
    ))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses((status = 200, description = "author_form view"))
)]
pub async fn author_create_get() -> View {
    View::new("author_form", json!({ "title": "Create Author" }))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirect to the author"),
        (status = 200, description = "author_form view with errors")
    )
)]
pub async fn author_create_post(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<AuthorForm>, AppError>,
) -> AppResult<Page> {
    match state.services.authors.create(form).await? {
        FormOutcome::Saved(author) => Ok(Page::redirect(author.url())),
        FormOutcome::Rejected(submission) => Ok(View::new(
            "author_form",
            json!({
                "title": "Create Author",
                "author": submission.value,
                "errors": submission.errors,
            }),
        )
        .into()),
    }
}

/// Author form pre-filled with the stored record
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = uuid::Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "author_form view"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_update_get(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<View> {
    let id = id.or_not_found("Author")?;
    let author = state.services.authors.get(id).await?;
    Ok(View::new(
        "author_form",
        json!({ "title": "Update Author", "author": author.view() }),
    ))
}

/// Update an author in place
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = uuid::Uuid, Path, description = "Author ID")),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirect to the author"),
        (status = 200, description = "author_form view with errors"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_update_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<AuthorForm>, AppError>,
) -> AppResult<Page> {
    let id = id.or_not_found("Author")?;
    match state.services.authors.update(id, form).await? {
        FormOutcome::Saved(author) => Ok(Page::redirect(author.url())),
        FormOutcome::Rejected(submission) => Ok(View::new(
            "author_form",
            json!({
                "title": "Update Author",
                "author": submission.value,
                "errors": submission.errors,
            }),
        )
        .into()),
    }
}

/// Delete confirmation, or the list of books blocking it
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = uuid::Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "author_delete view"),
        (status = 303, description = "No such author; redirect to the list")
    )
)]
pub async fn author_delete_get(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    match state.services.authors.delete_preview(id).await? {
        Some(current) => Ok(delete_view(current).into()),
        None => Ok(Page::redirect(LIST_URL)),
    }
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = uuid::Uuid, Path, description = "Author ID")),
    request_body(content = AuthorDeleteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 200, description = "author_delete view listing the blocking books"),
        (status = 400, description = "Form target differs from the path", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_delete_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<AuthorDeleteForm>, AppError>,
) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    check_delete_target(&form.authorid, id)?;
    match state.services.authors.delete(id).await? {
        DeleteOutcome::Blocked(current) => Ok(delete_view(current).into()),
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(Page::redirect(LIST_URL)),
    }
}
