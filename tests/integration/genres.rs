use axum::http::StatusCode;
use uuid::Uuid;

use super::{json_body, location, TestApp};

#[tokio::test]
async fn test_empty_name_rerenders_form() {
    let app = TestApp::new();
    let response = app.post_form("/catalog/genre/create", "name=+++").await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response).await;
    assert_eq!(page["view"], "genre_form");
    assert_eq!(page["title"], "Create Genre");
    assert_eq!(page["errors"][0]["field"], "name");
    assert_eq!(page["errors"][0]["message"], "Genre name required");
}

#[tokio::test]
async fn test_duplicate_name_redirects_to_existing() {
    let app = TestApp::new();
    let first = app.created("/catalog/genre/create", "name=Fantasy").await;
    let second = app.created("/catalog/genre/create", "name=Fantasy").await;
    assert_eq!(first, second);

    let list = app.view("/catalog/genres").await;
    assert_eq!(list["genres"].as_array().unwrap().len(), 1);
    assert_eq!(list["genres"][0]["url"], first.as_str());
}

#[tokio::test]
async fn test_markup_is_escaped_once() {
    let app = TestApp::new();
    let url = app
        .created("/catalog/genre/create", "name=%3Cb%3ENoir%3C%2Fb%3E")
        .await;

    let page = app.view(&url).await;
    assert_eq!(page["genre"]["name"], "&lt;b&gt;Noir&lt;&#x2F;b&gt;");

    // Submitting the stored form back yields the same genre
    let again = app
        .created("/catalog/genre/create", "name=%26lt%3Bb%26gt%3BNoir%26lt%3B%26%23x2F%3Bb%26gt%3B")
        .await;
    assert_eq!(again, url);
}

#[tokio::test]
async fn test_rename_conflict_is_form_error() {
    let app = TestApp::new();
    app.created("/catalog/genre/create", "name=Fantasy").await;
    let poetry = app.created("/catalog/genre/create", "name=Poetry").await;

    let response = app
        .post_form(&format!("{}/update", poetry), "name=Fantasy")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page["errors"][0]["message"], "Genre name already in use");

    let renamed = app
        .created(&format!("{}/update", poetry), "name=Verse")
        .await;
    assert_eq!(renamed, poetry);
    assert_eq!(app.view(&poetry).await["genre"]["name"], "Verse");
}

#[tokio::test]
async fn test_missing_genre_delete_redirects_to_list() {
    let app = TestApp::new();
    let missing = Uuid::new_v4();

    let response = app.get(&format!("/catalog/genre/{}/delete", missing)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genres");

    let response = app
        .post_form(&format!("/catalog/genre/{}/delete", missing), &format!("genreid={}", missing))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genres");

    assert_eq!(
        app.get(&format!("/catalog/genre/{}", missing)).await.status(),
        StatusCode::NOT_FOUND
    );
}
