//! Book copy pages

use axum::extract::State;
use axum_extra::extract::{Form, WithRejection};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{check_delete_target, Page, RecordId, View};
use crate::{
    error::{AppError, AppResult},
    models::{BookInstanceForm, BookSummary, CopyStatus},
    services::{DeleteOutcome, FormOutcome},
    AppState,
};

const LIST_URL: &str = "/catalog/bookinstances";

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CopyDeleteForm {
    pub copyid: String,
}

fn copy_form(title: &str, books: Vec<BookSummary>, selected: Option<Uuid>, copy: Value, errors: Value) -> View {
    View::new(
        "bookinstance_form",
        json!({
            "title": title,
            "book_list": books,
            "selected_book": selected,
            "bookinstance": copy,
            "statuses": CopyStatus::ALL,
            "errors": errors,
        }),
    )
}

/// List all copies with their book titles
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses((status = 200, description = "bookinstance_list view", body = Vec<crate::models::BookInstanceView>))
)]
pub async fn bookinstance_list(State(state): State<AppState>) -> AppResult<View> {
    let copies = state.services.book_instances.list().await?;
    Ok(View::new(
        "bookinstance_list",
        json!({
            "title": "Book Copies",
            "banner": "Copies in our library",
            "bookinstances": copies,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "bookinstance_detail view"),
        (status = 404, description = "Book copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn bookinstance_detail(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<View> {
    let id = id.or_not_found("Book copy")?;
    let copy = state.services.book_instances.detail(id).await?;
    let title = copy.book.as_ref().map(|b| b.title.as_str()).unwrap_or_default();
    Ok(View::new(
        "bookinstance_detail",
        json!({
            "title": format!("Copy: {}", title),
            "bookinstance": copy,
        }),
    ))
}

/// Empty copy form with the book choices
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses((status = 200, description = "bookinstance_form view"))
)]
pub async fn bookinstance_create_get(State(state): State<AppState>) -> AppResult<View> {
    let books = state.services.book_instances.book_options().await?;
    Ok(copy_form("Create BookInstance", books, None, Value::Null, json!([])))
}

/// Create a copy of an existing book
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirect to the copy"),
        (status = 200, description = "bookinstance_form view with errors")
    )
)]
pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<BookInstanceForm>, AppError>,
) -> AppResult<Page> {
    match state.services.book_instances.create(form).await? {
        FormOutcome::Saved(copy) => Ok(Page::redirect(copy.url())),
        FormOutcome::Rejected(submission) => {
            let books = state.services.book_instances.book_options().await?;
            Ok(copy_form(
                "Create BookInstance",
                books,
                submission.value.book,
                json!(submission.value),
                json!(submission.errors),
            )
            .into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "bookinstance_form view"),
        (status = 404, description = "Book copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn bookinstance_update_get(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<View> {
    let id = id.or_not_found("Book copy")?;
    let (copy, books) = state.services.book_instances.edit(id).await?;
    let book = books.iter().find(|b| b.id == copy.book).cloned();
    Ok(copy_form(
        "Update Copy",
        books,
        Some(copy.book),
        json!(copy.view(book)),
        json!([]),
    ))
}

/// Update a copy in place
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirect to the copy"),
        (status = 200, description = "bookinstance_form view with errors"),
        (status = 404, description = "Book copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn bookinstance_update_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<BookInstanceForm>, AppError>,
) -> AppResult<Page> {
    let id = id.or_not_found("Book copy")?;
    match state.services.book_instances.update(id, form).await? {
        FormOutcome::Saved(copy) => Ok(Page::redirect(copy.url())),
        FormOutcome::Rejected(submission) => {
            let books = state.services.book_instances.book_options().await?;
            Ok(copy_form(
                "Update Copy",
                books,
                submission.value.book,
                json!(submission.value),
                json!(submission.errors),
            )
            .into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "bookinstance_delete view"),
        (status = 303, description = "No such copy; redirect to the list")
    )
)]
pub async fn bookinstance_delete_get(
    State(state): State<AppState>,
    id: RecordId,
) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    match state.services.book_instances.delete_preview(id).await? {
        Some(copy) => Ok(View::new("bookinstance_delete", json!({ "title": "Delete Copy", "copy": copy })).into()),
        None => Ok(Page::redirect(LIST_URL)),
    }
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body(content = CopyDeleteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 400, description = "Form target differs from the path", body = crate::error::ErrorResponse)
    )
)]
pub async fn bookinstance_delete_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<CopyDeleteForm>, AppError>,
) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    check_delete_target(&form.copyid, id)?;
    match state.services.book_instances.delete(id).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing | DeleteOutcome::Blocked(()) => {
            Ok(Page::redirect(LIST_URL))
        }
    }
}
