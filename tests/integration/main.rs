//! In-process tests of the catalog router over the memory store

mod authors;
mod books;
mod genres;
mod pages;

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use locallibrary_server::{api, repository::Repository, AppConfig, AppState};

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let repository = Repository::in_memory(Duration::from_secs(2));
        let state = AppState::new(AppConfig::default(), repository);
        Self {
            router: api::create_router(state),
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST an already url-encoded form body
    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// GET a page that must render, returning its payload
    pub async fn view(&self, uri: &str) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        json_body(response).await
    }

    /// POST a form that must succeed, returning the redirect target
    pub async fn created(&self, uri: &str, body: &str) -> String {
        let response = self.post_form(uri, body).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {} {}", uri, body);
        location(&response)
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

/// Last path segment of a canonical record URL
pub fn id_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap()
}
