use axum::http::StatusCode;
use uuid::Uuid;

use super::{id_of, json_body, location, TestApp};

#[tokio::test]
async fn test_create_with_empty_dates_then_detail() {
    let app = TestApp::new();
    let url = app
        .created(
            "/catalog/author/create",
            "first_name=Jane&family_name=Austen&date_of_birth=&date_of_death=",
        )
        .await;
    assert!(url.starts_with("/catalog/author/"));

    let page = app.view(&url).await;
    assert_eq!(page["view"], "author_detail");
    assert_eq!(page["title"], "Author Details");
    assert_eq!(page["author"]["name"], "Austen, Jane");
    assert!(page["author"]["date_of_birth"].is_null());
    assert_eq!(page["author_books"], serde_json::json!([]));
}

#[tokio::test]
async fn test_invalid_form_rerendered_in_field_order() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/catalog/author/create",
            "first_name=&family_name=O%27Brien&date_of_birth=yesterday",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response).await;
    assert_eq!(page["view"], "author_form");
    let fields: Vec<_> = page["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        fields,
        vec!["first_name", "first_name", "family_name", "date_of_birth"]
    );
    // Sanitized values come back for the pre-filled form
    assert_eq!(page["author"]["family_name"], "O&#x27;Brien");

    let list = app.view("/catalog/authors").await;
    assert_eq!(list["authors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_list_sorted_by_family_name() {
    let app = TestApp::new();
    for family in ["Tolkien", "Austen", "Dickens"] {
        app.created(
            "/catalog/author/create",
            &format!("first_name=A&family_name={}", family),
        )
        .await;
    }

    let page = app.view("/catalog/authors").await;
    assert_eq!(page["title"], "Authors");
    let names: Vec<_> = page["authors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["family_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Austen", "Dickens", "Tolkien"]);
}

#[tokio::test]
async fn test_update_prefills_and_saves() {
    let app = TestApp::new();
    let url = app
        .created(
            "/catalog/author/create",
            "first_name=Jane&family_name=Austin&date_of_birth=1775-12-16",
        )
        .await;

    let form = app.view(&format!("{}/update", url)).await;
    assert_eq!(form["title"], "Update Author");
    assert_eq!(form["author"]["date_of_birth_update"], "1775-12-16");

    let saved = app
        .created(
            &format!("{}/update", url),
            "first_name=Jane&family_name=Austen&date_of_birth=1775-12-16",
        )
        .await;
    assert_eq!(saved, url);

    let page = app.view(&url).await;
    assert_eq!(page["author"]["name"], "Austen, Jane");
    assert_eq!(page["author"]["date_of_birth_formatted"], "December 16th, 1775");
}

#[tokio::test]
async fn test_missing_author_404_but_delete_redirects() {
    let app = TestApp::new();
    let missing = Uuid::new_v4();

    let response = app.get(&format!("/catalog/author/{}", missing)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Author not found");

    let response = app.get(&format!("/catalog/author/{}/update", missing)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get(&format!("/catalog/author/{}/delete", missing)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
}

#[tokio::test]
async fn test_delete_blocked_then_allowed() {
    let app = TestApp::new();
    let author_url = app
        .created("/catalog/author/create", "first_name=Jane&family_name=Austen")
        .await;
    let author_id = id_of(&author_url).to_string();
    let book_url = app
        .created(
            "/catalog/book/create",
            &format!("title=Emma&author={}&summary=Matchmaking&isbn=9780141439587", author_id),
        )
        .await;

    let preview = app.view(&format!("{}/delete", author_url)).await;
    assert_eq!(preview["view"], "author_delete");
    assert_eq!(preview["author_books"][0]["title"], "Emma");

    let response = app
        .post_form(&format!("{}/delete", author_url), &format!("authorid={}", author_id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let blocked = json_body(response).await;
    assert_eq!(blocked["view"], "author_delete");
    assert_eq!(blocked["author_books"].as_array().unwrap().len(), 1);
    app.view(&author_url).await;

    app.created(
        &format!("{}/delete", book_url),
        &format!("bookid={}", id_of(&book_url)),
    )
    .await;
    let redirect = app
        .created(&format!("{}/delete", author_url), &format!("authorid={}", author_id))
        .await;
    assert_eq!(redirect, "/catalog/authors");
    assert_eq!(app.get(&author_url).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_target_must_match_path() {
    let app = TestApp::new();
    let url = app
        .created("/catalog/author/create", "first_name=Jane&family_name=Austen")
        .await;

    let response = app
        .post_form(&format!("{}/delete", url), &format!("authorid={}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    app.view(&url).await;
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/catalog/author/not-an-id").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Author not found");

    let response = app.get("/catalog/author/not-an-id/update").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_form("/catalog/author/not-an-id/update", "first_name=Jane&family_name=Austen")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/catalog/author/not-an-id/delete").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");

    let response = app
        .post_form("/catalog/author/not-an-id/delete", "authorid=not-an-id")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");

    assert_eq!(app.view("/catalog/authors").await["authors"], serde_json::json!([]));
}
