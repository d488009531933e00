use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use listitems_server::{app, Config, ListItem, ListItemStore};
use tower::ServiceExt;

fn router() -> Router {
    app(Arc::new(ListItemStore::new()), &Config::default())
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Send one request through a clone of `app`, keeping the store shared.
async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

// --- list ---

#[tokio::test]
async fn list_items_empty() {
    let resp = send(&router(), empty_request("GET", "/api/listitems")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<ListItem> = body_json(resp).await;
    assert!(items.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_item_returns_201_with_first_id() {
    let resp = send(
        &router(),
        json_request(
            "POST",
            "/api/listitems",
            r#"{"title":"Buy milk","isCompleted":false}"#,
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()[http::header::LOCATION], "/api/listitems/1");
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(
        body,
        serde_json::json!({"id": 1, "title": "Buy milk", "isCompleted": false})
    );
}

#[tokio::test]
async fn create_item_ignores_client_id() {
    let resp = send(
        &router(),
        json_request(
            "POST",
            "/api/listitems",
            r#"{"id":42,"title":"Walk dog","isCompleted":true}"#,
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: ListItem = body_json(resp).await;
    assert_eq!(item.id, 1);
    assert!(item.is_completed);
}

#[tokio::test]
async fn create_item_blank_title_returns_400() {
    let app = router();
    let resp = send(&app, json_request("POST", "/api/listitems", r#"{"title":"  "}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Item title is required");

    let resp = send(&app, empty_request("GET", "/api/listitems")).await;
    let items: Vec<ListItem> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn create_item_missing_title_returns_400() {
    let resp = send(
        &router(),
        json_request("POST", "/api/listitems", r#"{"isCompleted":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_item_malformed_json_returns_400() {
    let resp = send(
        &router(),
        json_request("POST", "/api/listitems", r#"{"title":"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_item_trims_title() {
    let resp = send(
        &router(),
        json_request("POST", "/api/listitems", r#"{"title":"  Padded  "}"#),
    )
    .await;
    let item: ListItem = body_json(resp).await;
    assert_eq!(item.title, "Padded");
}

// --- get ---

#[tokio::test]
async fn get_item_not_found() {
    let resp = send(&router(), empty_request("GET", "/api/listitems/1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Item with ID 1 not found");
}

#[tokio::test]
async fn get_item_bad_id_returns_400() {
    let resp = send(&router(), empty_request("GET", "/api/listitems/not-a-number")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_and_delete_bad_id_return_json_400() {
    let app = router();
    let resp = send(
        &app,
        json_request("PUT", "/api/listitems/abc", r#"{"title":"x"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].is_string());

    let resp = send(&app, empty_request("DELETE", "/api/listitems/abc")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].is_string());
}

// --- update ---

#[tokio::test]
async fn update_item_not_found() {
    let resp = send(
        &router(),
        json_request(
            "PUT",
            "/api/listitems/999",
            r#"{"title":"x","isCompleted":true}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_item_blank_title_returns_400_before_lookup() {
    let resp = send(
        &router(),
        json_request("PUT", "/api/listitems/999", r#"{"title":""}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_item_trims_title_and_keeps_path_id() {
    let app = router();
    send(&app, json_request("POST", "/api/listitems", r#"{"title":"A"}"#)).await;

    let resp = send(
        &app,
        json_request(
            "PUT",
            "/api/listitems/1",
            r#"{"id":77,"title":" B ","isCompleted":true}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(
        body,
        serde_json::json!({"id": 1, "title": "B", "isCompleted": true})
    );

    let resp = send(&app, empty_request("GET", "/api/listitems/77")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_item_not_found() {
    let resp = send(&router(), empty_request("DELETE", "/api/listitems/1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_item_returns_204_and_empties_list() {
    let app = router();
    send(&app, json_request("POST", "/api/listitems", r#"{"title":"A"}"#)).await;

    let resp = send(&app, empty_request("DELETE", "/api/listitems/1")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = send(&app, empty_request("GET", "/api/listitems")).await;
    let items: Vec<ListItem> = body_json(resp).await;
    assert!(items.is_empty());

    let resp = send(&app, empty_request("DELETE", "/api/listitems/1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- cors ---

#[tokio::test]
async fn preflight_from_allowed_origin_is_accepted() {
    let resp = send(
        &router(),
        Request::builder()
            .method("OPTIONS")
            .uri("/api/listitems/1")
            .header(http::header::ORIGIN, "http://localhost:4200")
            .header(http::header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .header(http::header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(String::new())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:4200"
    );
}

#[tokio::test]
async fn other_origins_get_no_cors_grant() {
    let resp = send(
        &router(),
        Request::builder()
            .uri("/api/listitems")
            .header(http::header::ORIGIN, "http://evil.example")
            .body(String::new())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = router();

    let mut ids = Vec::new();
    for title in ["Walk dog", "Buy milk", "Call mum"] {
        let resp = send(
            &app,
            json_request("POST", "/api/listitems", &format!(r#"{{"title":"{title}"}}"#)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: ListItem = body_json(resp).await;
        assert!(ids.last().map_or(true, |last| created.id > *last));
        ids.push(created.id);
    }

    // update the middle one
    let resp = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/listitems/{}", ids[1]),
            r#"{"title":"Buy oat milk","isCompleted":true}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // delete the first one
    let resp = send(&app, empty_request("DELETE", &format!("/api/listitems/{}", ids[0]))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // 3 creates - 1 delete = 2, in insertion order, with the latest update
    let resp = send(&app, empty_request("GET", "/api/listitems")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<ListItem> = body_json(resp).await;
    assert_eq!(
        items,
        vec![
            ListItem {
                id: ids[1],
                title: "Buy oat milk".to_string(),
                is_completed: true,
            },
            ListItem {
                id: ids[2],
                title: "Call mum".to_string(),
                is_completed: false,
            },
        ]
    );

    let resp = send(&app, empty_request("GET", &format!("/api/listitems/{}", ids[2]))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: ListItem = body_json(resp).await;
    assert_eq!(fetched.title, "Call mum");
}
