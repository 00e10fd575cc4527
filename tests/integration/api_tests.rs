//! API integration tests against a running server
//!
//! Run with: cargo test --test api_tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Username unique to this test run
fn unique_username(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

/// Register a fresh user and return the token payload
async fn register(client: &Client, username: &str) -> Value {
    let response = client
        .post(format!("{}/user-register", BASE_URL))
        .json(&json!({ "username": username, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("Failed to parse register response")
}

async fn access_token(client: &Client) -> String {
    let body = register(client, &unique_username("tester")).await;
    body["access_token"].as_str().expect("No access token").to_string()
}

async fn post_json(client: &Client, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn send_json(
    client: &Client,
    method: reqwest::Method,
    token: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = client
        .request(method, format!("{}{}", BASE_URL, path))
        .bearer_auth(token);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await.expect("Failed to send request");

    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(client: &Client, token: &str, path: &str) -> (StatusCode, Value) {
    send_json(client, reqwest::Method::GET, token, path, None).await
}

async fn delete(client: &Client, token: &str, path: &str) -> StatusCode {
    send_json(client, reqwest::Method::DELETE, token, path, None).await.0
}

async fn open_lending(client: &Client, token: &str, book_id: i64, customer_id: i64) -> i64 {
    let (status, lending) = post_json(
        client,
        token,
        "/lendings",
        json!({ "book": book_id, "customer": customer_id, "lending_date": "2024-01-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    lending["id"].as_i64().expect("No lending ID")
}

async fn return_lending(client: &Client, token: &str, lending_id: i64) {
    let (status, _) = send_json(
        client,
        reqwest::Method::PATCH,
        token,
        &format!("/lendings/{}", lending_id),
        Some(json!({ "return_date": "2024-01-20" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

/// Author, category, book and customer ready for lending tests
async fn seed(client: &Client, token: &str) -> (i64, i64, i64) {
    let (_, author) = post_json(
        client,
        token,
        "/authors",
        json!({ "name": "Stanislaw", "surname": "Lem", "birth_date": "1921-09-12" }),
    )
    .await;
    let (_, category) = post_json(client, token, "/categories", json!({ "name": "Sci-fi" })).await;
    let (status, book) = post_json(
        client,
        token,
        "/books",
        json!({
            "title": "Solaris",
            "author": author["id"],
            "category": category["id"],
            "published_date": "1961-01-01"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["available"], true);

    let (status, customer) = post_json(
        client,
        token,
        "/customers",
        json!({
            "name": "Jan",
            "surname": "Kowalski",
            "address": "Main Street 1",
            "phone_number": "123456789",
            "email": "jan@example.com"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        author["id"].as_i64().expect("No author ID"),
        book["id"].as_i64().expect("No book ID"),
        customer["id"].as_i64().expect("No customer ID"),
    )
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_then_token_reuses_pair() {
    let client = Client::new();
    let username = unique_username("reuse");

    let registered = register(&client, &username).await;
    assert_eq!(registered["token_type"], "Bearer");
    assert_eq!(registered["scope"], "read write");
    assert_eq!(registered["access_token"].as_str().map(str::len), Some(30));

    let response = client
        .post(format!("{}/user-token", BASE_URL))
        .json(&json!({ "username": username, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["access_token"], registered["access_token"]);
    assert_eq!(body["refresh_token"], registered["refresh_token"]);
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_username() {
    let client = Client::new();
    let username = unique_username("dup");
    register(&client, &username).await;

    let response = client
        .post(format!("{}/user-register", BASE_URL))
        .json(&json!({ "username": username, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_token_wrong_password() {
    let client = Client::new();
    let username = unique_username("wrongpw");
    register(&client, &username).await;

    let response = client
        .post(format!("{}/user-token", BASE_URL))
        .json(&json!({ "username": username, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Wrong credentials");
}

#[tokio::test]
#[ignore]
async fn test_refresh_then_revoke() {
    let client = Client::new();
    let registered = register(&client, &unique_username("refresh")).await;

    let response = client
        .post(format!("{}/user-token/refresh", BASE_URL))
        .json(&json!({ "refresh_token": registered["refresh_token"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let refreshed: Value = response.json().await.expect("Failed to parse response");
    assert_ne!(refreshed["access_token"], registered["access_token"]);
    assert_eq!(refreshed["refresh_token"], registered["refresh_token"]);

    let token = refreshed["access_token"].as_str().expect("No access token");
    let response = client
        .post(format!("{}/user-token/revoke", BASE_URL))
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/authors", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_lending_flow() {
    let client = Client::new();
    let token = access_token(&client).await;
    let (author_id, book_id, customer_id) = seed(&client, &token).await;

    let (status, lending) = post_json(
        &client,
        &token,
        "/lendings",
        json!({ "book": book_id, "customer": customer_id, "lending_date": "2024-01-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let lending_id = lending["id"].as_i64().expect("No lending ID");

    // Book now unavailable
    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["available"], false);

    // Second open lending of the same book
    let (status, _) = post_json(
        &client,
        &token,
        "/lendings",
        json!({ "book": book_id, "customer": customer_id, "lending_date": "2024-01-11" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Guards while the lending is open
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .delete(format!("{}/lendings/{}", BASE_URL, lending_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Return date before the lending date
    let response = client
        .patch(format!("{}/lendings/{}", BASE_URL, lending_id))
        .bearer_auth(&token)
        .json(&json!({ "return_date": "2024-01-01" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Return date in the future
    let response = client
        .patch(format!("{}/lendings/{}", BASE_URL, lending_id))
        .bearer_auth(&token)
        .json(&json!({ "return_date": "2999-01-01" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .patch(format!("{}/lendings/{}", BASE_URL, lending_id))
        .bearer_auth(&token)
        .json(&json!({ "return_date": "2024-01-20" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    // Returned lending can go, then the author
    let response = client
        .delete(format!("{}/lendings/{}", BASE_URL, lending_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_book_with_unknown_author() {
    let client = Client::new();
    let token = access_token(&client).await;

    let (status, body) = post_json(
        &client,
        &token,
        "/books",
        json!({
            "title": "Nowhere",
            "author": 999_999_999,
            "category": 999_999_999,
            "published_date": "2000-01-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
#[ignore]
async fn test_customer_delete_guard() {
    let client = Client::new();
    let token = access_token(&client).await;
    let (_, book_id, customer_id) = seed(&client, &token).await;
    let lending_id = open_lending(&client, &token, book_id, customer_id).await;

    let customer_path = format!("/customers/{}", customer_id);
    assert_eq!(delete(&client, &token, &customer_path).await, StatusCode::BAD_REQUEST);

    return_lending(&client, &token, lending_id).await;
    assert_eq!(delete(&client, &token, &customer_path).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_book_delete_guard_and_availability() {
    let client = Client::new();
    let token = access_token(&client).await;
    let (_, book_id, customer_id) = seed(&client, &token).await;
    let book_path = format!("/books/{}", book_id);
    let lending_id = open_lending(&client, &token, book_id, customer_id).await;

    assert_eq!(delete(&client, &token, &book_path).await, StatusCode::BAD_REQUEST);
    let (_, book) = get_json(&client, &token, &book_path).await;
    assert_eq!(book["available"], false);

    return_lending(&client, &token, lending_id).await;
    let (_, book) = get_json(&client, &token, &book_path).await;
    assert_eq!(book["available"], true);

    assert_eq!(delete(&client, &token, &book_path).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_create_lending_with_future_return_date() {
    let client = Client::new();
    let token = access_token(&client).await;
    let (_, book_id, customer_id) = seed(&client, &token).await;

    let (status, body) = post_json(
        &client,
        &token,
        "/lendings",
        json!({
            "book": book_id,
            "customer": customer_id,
            "lending_date": "2024-01-10",
            "return_date": "2999-01-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10);
    assert_eq!(body["message"], "Return date cannot be later than today");
}

#[tokio::test]
#[ignore]
async fn test_replace_lending_without_return_date_keeps_it() {
    let client = Client::new();
    let token = access_token(&client).await;
    let (_, book_id, customer_id) = seed(&client, &token).await;
    let lending_id = open_lending(&client, &token, book_id, customer_id).await;
    return_lending(&client, &token, lending_id).await;

    let (status, lending) = send_json(
        &client,
        reqwest::Method::PUT,
        &token,
        &format!("/lendings/{}", lending_id),
        Some(json!({ "book": book_id, "customer": customer_id, "lending_date": "2024-01-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lending["return_date"], "2024-01-20");

    let (_, book) = get_json(&client, &token, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_patch_rejects_null_for_required_field() {
    let client = Client::new();
    let token = access_token(&client).await;
    let (_, book_id, _) = seed(&client, &token).await;

    let (status, body) = send_json(
        &client,
        reqwest::Method::PATCH,
        &token,
        &format!("/books/{}", book_id),
        Some(json!({ "title": null })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);

    let (_, book) = get_json(&client, &token, &format!("/books/{}", book_id)).await;
    assert_eq!(book["title"], "Solaris");
}

#[tokio::test]
#[ignore]
async fn test_author_delete_racing_new_lending() {
    let client = Client::new();
    let token = access_token(&client).await;

    for _ in 0..50 {
        let (author_id, book_id, customer_id) = seed(&client, &token).await;
        let author_path = format!("/authors/{}", author_id);

        let (deleted, (lent, lending)) = tokio::join!(
            delete(&client, &token, &author_path),
            post_json(
                &client,
                &token,
                "/lendings",
                json!({ "book": book_id, "customer": customer_id, "lending_date": "2024-01-10" }),
            ),
        );

        // Exactly one side wins
        assert!(
            !(deleted == StatusCode::NO_CONTENT && lent == StatusCode::CREATED),
            "open lending {} was deleted along with its author",
            lending["id"]
        );
        if lent == StatusCode::CREATED {
            assert_eq!(deleted, StatusCode::BAD_REQUEST);
            let lending_id = lending["id"].as_i64().expect("No lending ID");
            let (status, _) = get_json(&client, &token, &format!("/lendings/{}", lending_id)).await;
            assert_eq!(status, StatusCode::OK);
        }
    }
}
