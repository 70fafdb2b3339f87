use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use restql_core::GlobalId;
use restql_server::config::FileConfig;
use restql_server::graphql::build_schema;
use restql_server::routes::build_router;
use restql_server::store::Library;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let config = FileConfig::default();
    let schema = build_schema(Arc::new(Library::seeded()), &config.graphql);
    build_router(schema, &config).unwrap()
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn id(type_name: &str, raw: u32) -> String {
    GlobalId::new(type_name, raw.to_string()).encode()
}

#[tokio::test]
async fn books_first_page() {
    let (status, body) = get("/books?first=1").await;
    assert_eq!(status, StatusCode::OK);

    let books = &body["data"]["books"];
    assert_eq!(books["pageInfo"]["hasNextPage"], json!(true));
    assert_eq!(books["pageInfo"]["hasPreviousPage"], json!(false));

    let edges = books["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);

    let book = &edges[0]["node"];
    assert_eq!(book["id"], json!(id("Book", 1)));
    assert_eq!(book["title"], json!("Python Microservices Development"));
    assert_eq!(book["publisher"], json!({ "id": id("Publisher", 1) }));
    // A second connection on the same path is left out entirely.
    assert!(book.get("authors").is_none());
}

#[tokio::test]
async fn books_next_page_from_cursor() {
    let (_, body) = get("/books?first=1").await;
    let cursor = body["data"]["books"]["pageInfo"]["endCursor"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = get(&format!("/books?first=1&after={cursor}")).await;
    assert_eq!(status, StatusCode::OK);
    let books = &body["data"]["books"];
    assert_eq!(books["pageInfo"]["hasPreviousPage"], json!(true));
    assert_eq!(books["pageInfo"]["hasNextPage"], json!(false));
    assert_eq!(
        books["edges"][0]["node"]["title"],
        json!("Functional Programming in Python")
    );
}

#[tokio::test]
async fn node_by_global_id() {
    let (status, body) = get(&format!("/node?id={}", id("Book", 1))).await;
    assert_eq!(status, StatusCode::OK);

    let node = &body["data"]["node"];
    assert_eq!(node["title"], json!("Python Microservices Development"));
    assert_eq!(node["publisher"], json!({ "id": id("Publisher", 1) }));

    let edges = node["authors"]["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["node"], json!({ "id": id("Author", 1) }));
}

#[tokio::test]
async fn node_for_another_concrete_type() {
    let (status, body) = get(&format!("/node?id={}", id("Author", 2))).await;
    assert_eq!(status, StatusCode::OK);

    let node = &body["data"]["node"];
    assert_eq!(node["name"], json!("David Mertz"));
    let edges = node["books"]["edges"].as_array().unwrap();
    assert_eq!(edges[0]["node"], json!({ "id": id("Book", 2) }));
}

#[tokio::test]
async fn malformed_node_id_is_rejected() {
    let (status, body) = get("/node?id=@@@").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["errors"][0]["message"].as_str().unwrap();
    assert!(message.starts_with("Invalid global id"));
}

#[tokio::test]
async fn node_id_of_unknown_type_is_rejected() {
    let (status, body) = get(&format!("/node?id={}", id("Spaceship", 1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn publishers_reduce_nested_books_to_ids() {
    let (status, body) = get("/publishers").await;
    assert_eq!(status, StatusCode::OK);

    let edges = body["data"]["publishers"]["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[1]["node"]["name"], json!("O'Reilly Media"));
    // The publisher's own books are a connection nested in a connection.
    assert!(edges[1]["node"].get("books").is_none());
}

#[tokio::test]
async fn hello_and_create_person() {
    let (status, body) = get("/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "hello": "Hello stranger" } }));

    let response = app()
        .oneshot(
            Request::post("/createPerson")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "foo", "age": 20}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({
            "data": {
                "createPerson": { "person": { "name": "foo", "age": 20 }, "ok": true }
            }
        })
    );
}

#[test]
fn create_person_payload_is_nullable() {
    let config = FileConfig::default();
    let sdl = build_schema(Arc::new(Library::seeded()), &config.graphql).sdl();
    let line = sdl
        .lines()
        .find(|line| line.trim_start().starts_with("createPerson("))
        .unwrap();
    assert!(line.trim_end().ends_with(": CreatePersonPayload"));
}

#[tokio::test]
async fn server_routes_stay_available() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app()
        .oneshot(
            Request::post("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query": "{ hello(name: \"graph\") }"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["hello"], json!("Hello graph"));
}
