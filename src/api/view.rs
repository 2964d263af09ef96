//! Named view payloads handed to the page renderer

use axum::{
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{Map, Value};

/// A view name plus its data, sent as `{"view": name, ...payload}`
#[derive(Debug)]
pub struct View {
    name: &'static str,
    payload: Value,
}

impl View {
    pub fn new(name: &'static str, payload: Value) -> Self {
        Self { name, payload }
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("view".to_string(), Value::String(self.name.to_string()));
        if let Value::Object(fields) = self.payload {
            body.extend(fields);
        }
        Json(Value::Object(body)).into_response()
    }
}

/// Outcome of a page handler: render a view or send the browser elsewhere
#[derive(Debug)]
pub enum Page {
    View(View),
    Redirect(String),
}

impl Page {
    pub fn redirect(url: impl Into<String>) -> Self {
        Page::Redirect(url.into())
    }
}

impl From<View> for Page {
    fn from(view: View) -> Self {
        Page::View(view)
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::View(view) => view.into_response(),
            // 303 See Other, so the browser follows up with a GET
            Page::Redirect(url) => Redirect::to(&url).into_response(),
        }
    }
}
