//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to pick a seeded person for loan/reservation flows
async fn first_person_id(client: &Client, token: &str) -> String {
    let response = client
        .get(format!("{}/people", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to list people");

    let body: Value = response.json().await.expect("Failed to parse people response");
    body["people"][0]["id"]
        .as_str()
        .expect("No seeded people, run migrations first")
        .to_string()
}

/// Helper to create a throwaway book and return its id
async fn create_test_book(client: &Client, token: &str, title: &str) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "copies_total": 1
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_str().expect("No id in book response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
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
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["staff"]["username"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_staff() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_request_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_book_crud() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book_id = create_test_book(&client, &token, "Integration Test Book").await;

    // New book with no open loans is available
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get book");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(body["title"], "Integration Test Book");
    assert_eq!(body["availability"], "available");
    assert_eq!(body["copies_available"], 1);

    // Update
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "category": "Teologia" }))
        .send()
        .await
        .expect("Failed to update book");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(body["category"], "Teologia");

    // Soft delete
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to delete book");

    assert_eq!(response.status(), 204);

    // Deleted books drop out of the catalog
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get book");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_flag_blocks_checkout() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let person_id = first_person_id(&client, &token).await;

    let book_id = create_test_book(&client, &token, "Maintenance Test Book").await;

    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "under_maintenance": true }))
        .send()
        .await
        .expect("Failed to update book");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(body["availability"], "under_maintenance");

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "person_id": person_id }))
        .send()
        .await
        .expect("Failed to send checkout");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let person_id = first_person_id(&client, &token).await;

    let book_id = create_test_book(&client, &token, "Loan Lifecycle Book").await;

    // Checkout
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "person_id": person_id }))
        .send()
        .await
        .expect("Failed to send checkout");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = body["loan"]["id"].as_str().expect("No loan id").to_string();
    assert_eq!(body["loan"]["status"], "active");
    assert_eq!(body["loan"]["renewal_count"], 0);
    assert_eq!(body["loan"]["is_late"], false);

    // The single copy is now out
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["availability"], "loaned");
    assert_eq!(book["copies_available"], 0);

    // A second checkout of the same copy is refused
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "person_id": person_id }))
        .send()
        .await
        .expect("Failed to send checkout");
    assert_eq!(response.status(), 409);

    // Renew
    let response = client
        .post(format!("{}/loans/{}/renew", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to renew loan");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse loan");
    assert_eq!(body["loan"]["status"], "renewed");
    assert_eq!(body["loan"]["renewal_count"], 1);

    // Return
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to return loan");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse loan");
    assert_eq!(body["loan"]["status"], "returned");
    assert!(body["loan"]["returned_date"].is_string());

    // Returning twice is a conflict
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send second return");

    assert_eq!(response.status(), 409);

    // The copy is back on the shelf
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["availability"], "available");
}

#[tokio::test]
#[ignore]
async fn test_reservation_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let person_id = first_person_id(&client, &token).await;

    let book_id = create_test_book(&client, &token, "Reservation Lifecycle Book").await;

    // Reserve
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "person_id": person_id }))
        .send()
        .await
        .expect("Failed to create reservation");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse reservation");
    let reservation_id = body["reservation"]["id"]
        .as_str()
        .expect("No reservation id")
        .to_string();
    assert_eq!(body["reservation"]["status"], "active");
    assert_eq!(body["reservation"]["is_expired"], false);

    // Duplicate active reservation for the same person and book is refused
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "person_id": person_id }))
        .send()
        .await
        .expect("Failed to send duplicate reservation");

    assert_eq!(response.status(), 409);

    // Fulfill prompts the desk to check the book out
    let response = client
        .post(format!("{}/reservations/{}/fulfill", BASE_URL, reservation_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fulfill reservation");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse reservation");
    assert_eq!(body["reservation"]["status"], "fulfilled");
    assert!(body["message"]
        .as_str()
        .expect("No message")
        .contains("check the book out"));

    // Cancelling a fulfilled reservation is a conflict
    let response = client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, reservation_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send cancel");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_cancel_reservation() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let person_id = first_person_id(&client, &token).await;

    let book_id = create_test_book(&client, &token, "Cancel Reservation Book").await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "person_id": person_id }))
        .send()
        .await
        .expect("Failed to create reservation");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse reservation");
    let reservation_id = body["reservation"]["id"]
        .as_str()
        .expect("No reservation id")
        .to_string();

    let response = client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, reservation_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to cancel reservation");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse reservation");
    assert_eq!(body["reservation"]["status"], "cancelled");
}

#[tokio::test]
#[ignore]
async fn test_list_people() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/people", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["people"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_stats() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_books"].is_number());
    assert!(body["total_copies"].is_number());
    assert!(body["active_loans"].is_number());
    assert!(body["overdue_loans"].is_number());
    assert!(body["copies_available"].is_number());
    assert!(body["active_reservations"].is_number());
    assert!(body["popular_books"].is_array());
    assert!(body["recent_loans"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_isbn_lookup_rejects_invalid() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/books/lookup?isbn=not-an-isbn", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
