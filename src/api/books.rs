//! Book pages

use axum::extract::State;
use axum_extra::extract::{Form, WithRejection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{check_delete_target, Page, RecordId, View};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorView, BookForm, Genre, GenreView},
    services::{books::BookWithCopies, DeleteOutcome, FormOutcome},
    AppState,
};

const LIST_URL: &str = "/catalog/books";

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookDeleteForm {
    pub bookid: String,
}

/// Genre choice with its checkbox state
#[derive(Debug, Serialize)]
struct GenreOption {
    #[serde(flatten)]
    genre: GenreView,
    checked: bool,
}

fn book_form(
    title: &str,
    authors: Vec<Author>,
    genres: Vec<Genre>,
    selected: &[Uuid],
    book: serde_json::Value,
    errors: serde_json::Value,
) -> View {
    let authors: Vec<AuthorView> = authors.iter().map(Author::view).collect();
    let genres: Vec<GenreOption> = genres
        .iter()
        .map(|genre| GenreOption {
            checked: selected.contains(&genre.id),
            genre: genre.view(),
        })
        .collect();
    View::new(
        "book_form",
        json!({
            "title": title,
            "authors": authors,
            "genres": genres,
            "book": book,
            "errors": errors,
        }),
    )
}

fn delete_view(current: BookWithCopies) -> View {
    View::new(
        "book_delete",
        json!({
            "title": "Delete Book",
            "book": current.book,
            "book_instances": current.copies,
        }),
    )
}

/// List all books with their authors
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses((status = 200, description = "book_list view", body = Vec<crate::models::BookView>))
)]
pub async fn book_list(State(state): State<AppState>) -> AppResult<View> {
    let books = state.services.books.list().await?;
    Ok(View::new("book_list", json!({ "title": "Book List", "book_list": books })))
}

/// Show one book with its author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "book_detail view"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_detail(State(state): State<AppState>, id: RecordId) -> AppResult<View> {
    let id = id.or_not_found("Book")?;
    let BookWithCopies { book, copies } = state.services.books.detail(id).await?;
    Ok(View::new(
        "book_detail",
        json!({
            "title": book.title,
            "book": book,
            "book_instances": copies,
        }),
    ))
}

/// Empty book form with author and genre choices
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses((status = 200, description = "book_form view"))
)]
pub async fn book_create_get(State(state): State<AppState>) -> AppResult<View> {
    let (authors, genres) = state.services.books.form_options().await?;
    Ok(book_form("Create Book", authors, genres, &[], json!(null), json!([])))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirect to the book"),
        (status = 200, description = "book_form view with errors")
    )
)]
pub async fn book_create_post(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<BookForm>, AppError>,
) -> AppResult<Page> {
    match state.services.books.create(form).await? {
        FormOutcome::Saved(book) => Ok(Page::redirect(book.url())),
        FormOutcome::Rejected(submission) => {
            let (authors, genres) = state.services.books.form_options().await?;
            Ok(book_form(
                "Create Book",
                authors,
                genres,
                &submission.value.genre,
                json!(submission.value),
                json!(submission.errors),
            )
            .into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "book_form view"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_update_get(State(state): State<AppState>, id: RecordId) -> AppResult<View> {
    let id = id.or_not_found("Book")?;
    let (book, authors, genres) = state.services.books.edit(id).await?;
    Ok(book_form(
        "Update Book",
        authors,
        genres,
        &book.genre,
        json!(book),
        json!([]),
    ))
}

/// Update a book in place
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirect to the book"),
        (status = 200, description = "book_form view with errors"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_update_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<BookForm>, AppError>,
) -> AppResult<Page> {
    let id = id.or_not_found("Book")?;
    match state.services.books.update(id, form).await? {
        FormOutcome::Saved(book) => Ok(Page::redirect(book.url())),
        FormOutcome::Rejected(submission) => {
            let (authors, genres) = state.services.books.form_options().await?;
            Ok(book_form(
                "Update Book",
                authors,
                genres,
                &submission.value.genre,
                json!(submission.value),
                json!(submission.errors),
            )
            .into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "book_delete view"),
        (status = 303, description = "No such book; redirect to the list")
    )
)]
pub async fn book_delete_get(State(state): State<AppState>, id: RecordId) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    match state.services.books.delete_preview(id).await? {
        Some(current) => Ok(delete_view(current).into()),
        None => Ok(Page::redirect(LIST_URL)),
    }
}

/// Delete a book that has no copies
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body(content = BookDeleteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 200, description = "book_delete view listing the blocking copies"),
        (status = 400, description = "Form target differs from the path", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_delete_post(
    State(state): State<AppState>,
    id: RecordId,
    WithRejection(Form(form), _): WithRejection<Form<BookDeleteForm>, AppError>,
) -> AppResult<Page> {
    let Some(id) = id.0 else {
        return Ok(Page::redirect(LIST_URL));
    };
    check_delete_target(&form.bookid, id)?;
    match state.services.books.delete(id).await? {
        DeleteOutcome::Blocked(current) => Ok(delete_view(current).into()),
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(Page::redirect(LIST_URL)),
    }
}
