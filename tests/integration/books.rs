use axum::http::StatusCode;
use uuid::Uuid;

use super::{id_of, json_body, location, TestApp};

/// An author and two genres to hang books on
async fn seed(app: &TestApp) -> (String, String, String) {
    let author = app
        .created("/catalog/author/create", "first_name=Jane&family_name=Austen")
        .await;
    let romance = app.created("/catalog/genre/create", "name=Romance").await;
    let satire = app.created("/catalog/genre/create", "name=Satire").await;
    (
        id_of(&author).to_string(),
        id_of(&romance).to_string(),
        id_of(&satire).to_string(),
    )
}

fn book_form(title: &str, author: &str, genres: &[&str]) -> String {
    let mut body = format!("title={}&author={}&summary=A+novel&isbn=9780141439587", title, author);
    for genre in genres {
        body.push_str(&format!("&genre={}", genre));
    }
    body
}

#[tokio::test]
async fn test_create_with_repeated_genres() {
    let app = TestApp::new();
    let (author, romance, satire) = seed(&app).await;

    let url = app
        .created("/catalog/book/create", &book_form("Emma", &author, &[&romance, &satire]))
        .await;

    let page = app.view(&url).await;
    assert_eq!(page["view"], "book_detail");
    assert_eq!(page["title"], "Emma");
    assert_eq!(page["book"]["author"]["name"], "Austen, Jane");
    let genres: Vec<_> = page["book"]["genre"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(genres, vec!["Romance", "Satire"]);
    assert_eq!(page["book_instances"], serde_json::json!([]));
}

#[tokio::test]
async fn test_form_lists_choices_and_checks_genres() {
    let app = TestApp::new();
    let (author, romance, _) = seed(&app).await;

    let empty = app.view("/catalog/book/create").await;
    assert_eq!(empty["authors"][0]["name"], "Austen, Jane");
    assert_eq!(empty["genres"].as_array().unwrap().len(), 2);

    let url = app
        .created("/catalog/book/create", &book_form("Emma", &author, &[&romance]))
        .await;
    let form = app.view(&format!("{}/update", url)).await;
    assert_eq!(form["title"], "Update Book");
    assert_eq!(form["genres"][0]["name"], "Romance");
    assert_eq!(form["genres"][0]["checked"], true);
    assert_eq!(form["genres"][1]["checked"], false);
}

#[tokio::test]
async fn test_unknown_author_and_bad_genre_rejected() {
    let app = TestApp::new();
    let (_, romance, _) = seed(&app).await;

    let response = app
        .post_form(
            "/catalog/book/create",
            &book_form("Emma", &Uuid::new_v4().to_string(), &[&romance]),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page["errors"][0]["message"], "Author not found");

    let response = app
        .post_form("/catalog/book/create", &book_form("", "", &["nonsense"]))
        .await;
    let page = json_body(response).await;
    let messages: Vec<_> = page["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        messages,
        vec!["Title must not be empty.", "Author must not be empty.", "Invalid genre"]
    );
    assert_eq!(app.view("/catalog/books").await["book_list"], serde_json::json!([]));
}

#[tokio::test]
async fn test_copies_list_detail_and_guarded_delete() {
    let app = TestApp::new();
    let (author, _, _) = seed(&app).await;
    let persuasion = app
        .created("/catalog/book/create", &book_form("Persuasion", &author, &[]))
        .await;
    let emma = app
        .created("/catalog/book/create", &book_form("Emma", &author, &[]))
        .await;

    let copy = app
        .created(
            "/catalog/bookinstance/create",
            &format!("book={}&imprint=Vintage&status=Loaned&due_back=2024-09-01", id_of(&emma)),
        )
        .await;
    app.created(
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Penguin&status=", id_of(&persuasion)),
    )
    .await;
    app.created(
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Oxford&status=Available", id_of(&emma)),
    )
    .await;

    let list = app.view("/catalog/bookinstances").await;
    assert_eq!(list["banner"], "Copies in our library");
    let rows: Vec<_> = list["bookinstances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            format!(
                "{}/{}/{}",
                c["book"]["title"].as_str().unwrap(),
                c["imprint"].as_str().unwrap(),
                c["status"].as_str().unwrap()
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec!["Emma/Oxford/Available", "Emma/Vintage/Loaned", "Persuasion/Penguin/Maintenance"]
    );

    let detail = app.view(&copy).await;
    assert_eq!(detail["title"], "Copy: Emma");
    assert_eq!(detail["bookinstance"]["due_back_formatted"], "September 1st, 2024");

    // Copies block the book delete
    let response = app
        .post_form(&format!("{}/delete", emma), &format!("bookid={}", id_of(&emma)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let blocked = json_body(response).await;
    assert_eq!(blocked["view"], "book_delete");
    assert_eq!(blocked["book_instances"].as_array().unwrap().len(), 2);

    let redirect = app
        .created(&format!("{}/delete", copy), &format!("copyid={}", id_of(&copy)))
        .await;
    assert_eq!(redirect, "/catalog/bookinstances");
    assert_eq!(app.get(&copy).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_copy_form_rules() {
    let app = TestApp::new();
    let (author, _, _) = seed(&app).await;
    let emma = app
        .created("/catalog/book/create", &book_form("Emma", &author, &[]))
        .await;

    let choices = app.view("/catalog/bookinstance/create").await;
    assert_eq!(choices["book_list"][0]["title"], "Emma");
    assert_eq!(
        choices["statuses"],
        serde_json::json!(["Available", "Maintenance", "Loaned", "Reserved"])
    );

    let response = app
        .post_form(
            "/catalog/bookinstance/create",
            &format!("book={}&imprint=Vintage&status=Lost&due_back=someday", id_of(&emma)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page["view"], "bookinstance_form");
    assert_eq!(page["selected_book"], id_of(&emma));
    let messages: Vec<_> = page["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(messages, vec!["Invalid status", "Invalid date"]);

    let response = app
        .post_form(
            "/catalog/bookinstance/create",
            &format!("book={}&imprint=Vintage", Uuid::new_v4()),
        )
        .await;
    let page = json_body(response).await;
    assert_eq!(page["errors"][0]["message"], "Book not found");

    let response = app
        .get(&format!("/catalog/bookinstance/{}/delete", Uuid::new_v4()))
        .await;
    assert_eq!(location(&response), "/catalog/bookinstances");
}

#[tokio::test]
async fn test_malformed_book_and_copy_ids() {
    let app = TestApp::new();

    let response = app.get("/catalog/book/12345").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Book not found");

    let response = app.get("/catalog/bookinstance/12345/update").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Book copy not found");

    let response = app.get("/catalog/book/12345/delete").await;
    assert_eq!(location(&response), "/catalog/books");

    let response = app
        .post_form("/catalog/bookinstance/12345/delete", "copyid=12345")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");
}
