//! Inspection server for exercising the HTTP wrapper over real sockets.
//!
//! Endpoints mirror the classic httpbin layout: `/anything` echoes the
//! request back as JSON, `/json`, `/xml` and `/text` serve fixed bodies
//! with matching content types, `/broken-json` declares JSON but returns
//! garbage, `/status/{code}` answers with an arbitrary status, and
//! `/basic-auth/{user}/{pass}` validates an `Authorization: Basic` header.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use base64::engine::general_purpose;
use base64::Engine as _;
use serde::Serialize;

/// Echo of one received request.
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub method: String,
    pub args: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/anything", any(echo))
        .route("/json", get(fixed_json))
        .route("/xml", get(fixed_xml))
        .route("/text", get(fixed_text))
        .route("/broken-json", get(broken_json))
        .route("/status/{code}", any(status))
        .route("/basic-auth/{user}/{pass}", get(basic_auth))
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    Query(args): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Json<Inspection> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).to_string(),
            )
        })
        .collect();
    Json(Inspection {
        method: method.to_string(),
        args,
        headers,
        body,
    })
}

async fn fixed_json() -> impl IntoResponse {
    Json(serde_json::json!({ "origin": "mock", "slideshow": { "title": "Sample" } }))
}

async fn fixed_xml() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        "<note><to>caller</to><from>mock</from></note>",
    )
}

async fn fixed_text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "plain text body")
}

async fn broken_json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{not json")
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

async fn basic_auth(
    Path((user, pass)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let expected = format!(
        "Basic {}",
        general_purpose::STANDARD.encode(format!("{user}:{pass}"))
    );
    let supplied = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if supplied == Some(expected.as_str()) {
        Ok(Json(
            serde_json::json!({ "authenticated": true, "user": user }),
        ))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
