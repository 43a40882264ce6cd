//! Request helpers shared by the router-level suites.
#![allow(dead_code)] // not every suite uses every helper

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.expect("router call")
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn get_as(app: &Router, uri: &str, token: &str) -> Response {
    send(
        app,
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, format!("session_token={token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session_token={token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), 1 << 20).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}
