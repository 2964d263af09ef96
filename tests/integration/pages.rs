use axum::http::StatusCode;

use super::{json_body, location, TestApp};

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let app = TestApp::new();
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog");
}

#[tokio::test]
async fn test_index_counts() {
    let app = TestApp::new();
    let author = app
        .created("/catalog/author/create", "first_name=Jane&family_name=Austen")
        .await;
    app.created("/catalog/genre/create", "name=Romance").await;
    let book = app
        .created(
            "/catalog/book/create",
            &format!(
                "title=Emma&author={}&summary=s&isbn=i",
                super::id_of(&author)
            ),
        )
        .await;
    for status in ["Available", "Loaned"] {
        app.created(
            "/catalog/bookinstance/create",
            &format!("book={}&imprint=Penguin&status={}", super::id_of(&book), status),
        )
        .await;
    }

    let page = app.view("/catalog").await;
    assert_eq!(page["view"], "index");
    assert_eq!(page["title"], "Local Library Home");
    assert_eq!(
        page["data"],
        serde_json::json!({
            "book_count": 1,
            "book_instance_count": 2,
            "book_instance_available_count": 1,
            "author_count": 1,
            "genre_count": 1,
        })
    );
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = TestApp::new();
    let health = app.view("/api/v1/health").await;
    assert_eq!(health["status"], "healthy");

    let ready = app.get("/api/v1/ready").await;
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(json_body(ready).await["status"], "ready");
}

#[tokio::test]
async fn test_malformed_form_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .post_form("/catalog/genre/create", "name=Poetry&colour=blue")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
