//! Catalog home page

use axum::extract::State;
use serde_json::json;

use super::{Page, View};
use crate::{error::AppResult, AppState};

/// Home page with record counts
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses((status = 200, description = "index view with record counts"))
)]
pub async fn index(State(state): State<AppState>) -> AppResult<View> {
    let counts = state.services.catalog.counts().await?;
    Ok(View::new(
        "index",
        json!({ "title": "Local Library Home", "data": counts }),
    ))
}

/// The site root lands on the catalog
pub async fn root() -> Page {
    Page::redirect("/catalog")
}
