//! API integration tests

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, AppConfig, AppState};

fn app() -> Router {
    api::router(AppState::new(AppConfig::default()))
}

/// Send a request and decode the JSON body
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

async fn create(app: &Router, payload: Value) -> String {
    let (status, body) = send(app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["bookId"].as_str().expect("No book ID").to_string()
}

async fn count(app: &Router) -> usize {
    let (_, body) = send(app, Method::GET, "/books", None).await;
    body["data"]["books"].as_array().expect("No books array").len()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"], 0);
}

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({
            "name": "Buku A",
            "year": 2010,
            "author": "John Doe",
            "summary": "Lorem ipsum dolor sit amet",
            "publisher": "Dicoding Indonesia",
            "pageCount": 100,
            "readPage": 25,
            "reading": false
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    let id = body["data"]["bookId"].as_str().expect("No book ID");
    assert_eq!(id.len(), 16);

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let book = &body["data"]["book"];
    assert_eq!(book["id"], id);
    assert_eq!(book["name"], "Buku A");
    assert_eq!(book["year"], 2010);
    assert_eq!(book["author"], "John Doe");
    assert_eq!(book["summary"], "Lorem ipsum dolor sit amet");
    assert_eq!(book["publisher"], "Dicoding Indonesia");
    assert_eq!(book["pageCount"], 100);
    assert_eq!(book["readPage"], 25);
    assert_eq!(book["finished"], false);
    assert_eq!(book["reading"], false);
    assert!(book["insertedAt"].as_str().is_some_and(|s| s.ends_with('Z')));
    assert_eq!(book["insertedAt"], book["updatedAt"]);
}

#[tokio::test]
async fn test_create_finished_book() {
    let app = app();
    let id = create(&app, json!({ "name": "Dune", "pageCount": 200, "readPage": 200 })).await;

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["finished"], true);
    assert_eq!(body["data"]["book"]["reading"], false);
}

#[tokio::test]
async fn test_create_without_name() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "", "pageCount": 10, "readPage": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
    assert_eq!(count(&app).await, 0);
}

#[tokio::test]
async fn test_create_negative_pages() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Dune", "pageCount": 10, "readPage": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].as_str().unwrap().contains("tidak boleh negatif"));
    assert_eq!(count(&app).await, 0);
}

#[tokio::test]
async fn test_create_read_page_exceeds_page_count() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Dune", "pageCount": 10, "readPage": 15 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );
    assert_eq!(count(&app).await, 0);
}

#[tokio::test]
async fn test_create_malformed_body() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Dune", "pageCount": "many" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(count(&app).await, 0);
}

#[tokio::test]
async fn test_list_filters() {
    let app = app();
    let reading = create(
        &app,
        json!({ "name": "Dune", "publisher": "Chilton", "pageCount": 100, "readPage": 10, "reading": true }),
    )
    .await;
    let finished = create(
        &app,
        json!({ "name": "Foundation", "publisher": "Gnome", "pageCount": 50, "readPage": 50, "reading": false }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/books?reading=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["books"],
        json!([{ "id": reading, "name": "Dune", "publisher": "Chilton" }])
    );

    let (_, body) = send(&app, Method::GET, "/books?finished=1", None).await;
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], finished);

    let (_, body) = send(&app, Method::GET, "/books?finished=0&name=DUNE", None).await;
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], reading);

    let (_, body) = send(&app, Method::GET, "/books?name=zzz", None).await;
    assert_eq!(body["data"]["books"], json!([]));

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books[0]["id"], reading);
    assert_eq!(books[1]["id"], finished);
    assert!(books[0].get("pageCount").is_none());
}

#[tokio::test]
async fn test_get_missing_book() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books/xxxxx", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku tidak ditemukan");
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let id = create(&app, json!({ "name": "Dune", "pageCount": 100, "readPage": 10 })).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({
            "name": "Dune Messiah",
            "year": 1969,
            "author": "Frank Herbert",
            "summary": "Sequel",
            "publisher": "Putnam",
            "pageCount": 256,
            "readPage": 256,
            "reading": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil diperbarui");

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    let book = &body["data"]["book"];
    assert_eq!(book["id"], id);
    assert_eq!(book["name"], "Dune Messiah");
    assert_eq!(book["publisher"], "Putnam");
    assert_eq!(book["finished"], true);
    assert_eq!(book["reading"], true);
}

#[tokio::test]
async fn test_update_failures() {
    let app = app();
    let id = create(&app, json!({ "name": "Dune", "pageCount": 100, "readPage": 10 })).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/xxxxx",
        Some(json!({ "name": "Dune", "pageCount": 100, "readPage": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "pageCount": 100, "readPage": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "name": "Dune", "pageCount": 100, "readPage": 101 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
    );
}

#[tokio::test]
async fn test_update_allows_negative_pages() {
    let app = app();
    let id = create(&app, json!({ "name": "Dune", "pageCount": 100, "readPage": 10 })).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "name": "Dune", "pageCount": -1, "readPage": -2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["pageCount"], -1);
    assert_eq!(body["data"]["book"]["readPage"], -2);
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    let id = create(&app, json!({ "name": "Dune", "pageCount": 1, "readPage": 0 })).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil dihapus");

    let (status, _) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");
}

#[tokio::test]
async fn test_opaque_fields_round_trip() {
    let app = app();
    let id = create(
        &app,
        json!({
            "name": "Dune",
            "year": "2010",
            "author": 42,
            "summary": { "short": "Spice" },
            "publisher": 3000000000u64,
            "pageCount": 10,
            "readPage": 1
        }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let book = &body["data"]["book"];
    assert_eq!(book["year"], "2010");
    assert_eq!(book["author"], 42);
    assert_eq!(book["summary"], json!({ "short": "Spice" }));
    assert_eq!(book["publisher"], 3000000000u64);

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["data"]["books"][0]["publisher"], 3000000000u64);
}

#[tokio::test]
async fn test_list_with_repeated_keys() {
    let app = app();
    let reading = create(
        &app,
        json!({ "name": "Dune", "pageCount": 100, "readPage": 10, "reading": true }),
    )
    .await;
    let idle = create(
        &app,
        json!({ "name": "Foundation", "pageCount": 100, "readPage": 10, "reading": false }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/books?reading=1&reading=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], idle);

    let (status, body) = send(&app, Method::GET, "/books?reading=1&finished=0&finished=0", None).await;
    assert_eq!(status, StatusCode::OK);
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], reading);
}
