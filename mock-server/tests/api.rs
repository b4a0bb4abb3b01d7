use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_get_path_and_query() {
    let resp = app()
        .oneshot(request("GET", "/users/42?fields=name", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/users/42");
    assert_eq!(echo.query.as_deref(), Some("fields=name"));
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echo_reflects_post_body_and_headers() {
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(r#"{"name":"ada"}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.path, "/users");
    assert!(echo.query.is_none());
    assert_eq!(echo.body, r#"{"name":"ada"}"#);
    assert_eq!(echo.headers["content-type"], "application/json");
}

#[tokio::test]
async fn echo_accepts_every_verb() {
    for method in ["DELETE", "PATCH", "PUT"] {
        let resp = app().oneshot(request(method, "/things/1", "x")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{method}");
        let echo: Echo = body_json(resp).await;
        assert_eq!(echo.method, method);
    }
}

#[tokio::test]
async fn head_returns_ok() {
    let resp = app().oneshot(request("HEAD", "/ping", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- status ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(request("GET", "/status/418", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn status_route_rejects_invalid_code() {
    let resp = app().oneshot(request("GET", "/status/99", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
