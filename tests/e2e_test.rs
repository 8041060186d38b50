mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use library_api::api::{
    BookResponse, ErrorResponse, LoanCreatedResponse, LoanResponse, PageResponse, create_router,
    handlers::AppState,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// ヘルパー
// ============================================================================

fn app() -> Router {
    let ctx = common::memory_context();
    create_router(Arc::new(AppState {
        service_deps: ctx.deps,
    }))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).expect("unexpected response body")
}

async fn create_book(app: &Router, isbn: &str) -> BookResponse {
    let (status, body) = send(
        app,
        "POST",
        "/api/books",
        Some(json!({"title": "As aventuras", "author": "Fulano", "isbn": isbn})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

async fn create_loan(app: &Router, isbn: &str, customer: &str) -> (StatusCode, Vec<u8>) {
    send(
        app,
        "POST",
        "/api/loans",
        Some(json!({"isbn": isbn, "customer": customer, "customer_email": "customer@email.com"})),
    )
    .await
}

// ============================================================================
// 書籍
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_create_and_get_book() {
    let app = app();

    let created = create_book(&app, "123").await;
    assert_eq!(created.title, "As aventuras");
    let id = created.id.expect("created book has an id");

    let (status, body) = send(&app, "GET", &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<BookResponse>(&body), created);
}

#[tokio::test]
async fn test_create_book_with_duplicate_isbn_is_rejected() {
    let app = app();
    create_book(&app, "123").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"title": "Outro", "author": "Ciclano", "isbn": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).errors, vec!["Isbn already registered"]);
}

#[tokio::test]
async fn test_create_book_reports_every_missing_field() {
    let app = app();

    let (status, body) = send(&app, "POST", "/api/books", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).errors.len(), 3);
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let app = app();
    let missing = uuid::Uuid::new_v4();

    let (status, _) = send(&app, "GET", &format!("/api/books/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/books/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/books/{}", missing),
        Some(json!({"title": "t", "author": "a", "isbn": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_book_keeps_isbn() {
    let app = app();
    let created = create_book(&app, "123").await;
    let id = created.id.unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/books/{}", id),
        Some(json!({"title": "Novo", "author": "Beltrano", "isbn": "999"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated: BookResponse = parse(&body);
    assert_eq!(updated.title, "Novo");
    assert_eq!(updated.author, "Beltrano");
    assert_eq!(updated.isbn, "123");
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    let id = create_book(&app, "123").await.id.unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_books_filters_and_pages() {
    let app = app();
    for isbn in ["1", "2", "3"] {
        create_book(&app, isbn).await;
    }

    let (status, body) = send(&app, "GET", "/api/books?author=fula&page=0&size=2", None).await;

    assert_eq!(status, StatusCode::OK);
    let page: PageResponse<BookResponse> = parse(&body);
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.size, 2);

    let (_, body) = send(&app, "GET", "/api/books?isbn=2", None).await;
    let page: PageResponse<BookResponse> = parse(&body);
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].isbn, "2");
}

// ============================================================================
// 貸出
// ============================================================================

#[tokio::test]
async fn test_loan_lifecycle() {
    let app = app();
    create_book(&app, "123").await;

    let (status, body) = create_loan(&app, "123", "Fulano").await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = parse::<LoanCreatedResponse>(&body).id;

    // 未返却のため2件目は拒否
    let (status, body) = create_loan(&app, "123", "Ciclano").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).errors, vec!["Book already loaned."]);

    let (status, body) = send(&app, "GET", &format!("/api/loans/{}", loan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let loan: LoanResponse = parse(&body);
    assert_eq!(loan.returned, None);
    assert_eq!(loan.book.isbn, "123");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/loans/{}", loan_id),
        Some(json!({"returned": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<LoanResponse>(&body).returned, Some(true));

    // 返却後は再び貸出可能
    let (status, _) = create_loan(&app, "123", "Ciclano").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_loan_for_unknown_isbn_is_bad_request() {
    let app = app();

    let (status, body) = create_loan(&app, "404", "Fulano").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse::<ErrorResponse>(&body).errors,
        vec!["Book not found for passed isbn."]
    );
}

#[tokio::test]
async fn test_loan_request_requires_isbn_and_customer() {
    let app = app();

    let (status, body) = send(&app, "POST", "/api/loans", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse::<ErrorResponse>(&body).errors,
        vec!["customer must not be empty", "isbn must not be empty"]
    );
}

#[tokio::test]
async fn test_loan_with_malformed_email_is_rejected() {
    let app = app();
    create_book(&app, "123").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/loans",
        Some(json!({"isbn": "123", "customer": "Fulano", "customer_email": "not an address"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse::<ErrorResponse>(&body).errors,
        vec!["customer_email must be a valid e-mail"]
    );

    // 拒否された貸出は残らない
    let (status, _) = create_loan(&app, "123", "Fulano").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_loan_with_blank_email_is_accepted_without_email() {
    let app = app();
    let id = create_book(&app, "123").await.id.unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/loans",
        Some(json!({"isbn": "123", "customer": "Fulano", "customer_email": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", &format!("/api/books/{}/loans", id), None).await;
    let page: PageResponse<LoanResponse> = parse(&body);
    assert_eq!(page.content[0].customer_email, None);
}

// ============================================================================
// 不正なリクエスト
// ============================================================================

#[tokio::test]
async fn test_wrongly_typed_json_field_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, "POST", "/api/books", Some(json!({"title": 5}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).errors.len(), 1);
}

#[tokio::test]
async fn test_return_without_flag_is_bad_request() {
    let app = app();
    create_book(&app, "123").await;
    let (_, body) = create_loan(&app, "123", "Fulano").await;
    let loan_id = parse::<LoanCreatedResponse>(&body).id;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/loans/{}", loan_id),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = parse::<ErrorResponse>(&body).errors;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("returned"));
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = app();

    for uri in ["/api/books/not-a-uuid", "/api/loans/not-a-uuid"] {
        let (status, body) = send(&app, "GET", uri, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse::<ErrorResponse>(&body).errors.len(), 1);
    }
}

#[tokio::test]
async fn test_malformed_page_parameter_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/books?page=first", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).errors.len(), 1);
}

#[tokio::test]
async fn test_return_unknown_loan_is_not_found() {
    let app = app();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/loans/{}", uuid::Uuid::new_v4()),
        Some(json!({"returned": true})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_loans_by_customer_or_isbn() {
    let app = app();
    create_book(&app, "1").await;
    create_book(&app, "2").await;
    create_book(&app, "3").await;
    create_loan(&app, "1", "Fulano").await;
    create_loan(&app, "2", "Ciclano").await;
    create_loan(&app, "3", "Beltrano").await;

    let (status, body) = send(&app, "GET", "/api/loans?isbn=1&customer=Ciclano", None).await;

    assert_eq!(status, StatusCode::OK);
    let page: PageResponse<LoanResponse> = parse(&body);
    assert_eq!(page.total_elements, 2);
    let mut customers: Vec<_> = page.content.iter().map(|l| l.customer.clone()).collect();
    customers.sort();
    assert_eq!(customers, vec!["Ciclano", "Fulano"]);
}

#[tokio::test]
async fn test_list_loans_of_book() {
    let app = app();
    let id = create_book(&app, "123").await.id.unwrap();
    create_loan(&app, "123", "Fulano").await;

    let (status, body) = send(&app, "GET", &format!("/api/books/{}/loans", id), None).await;

    assert_eq!(status, StatusCode::OK);
    let page: PageResponse<LoanResponse> = parse(&body);
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].customer, "Fulano");
    assert_eq!(
        page.content[0].customer_email.as_deref(),
        Some("customer@email.com")
    );
}
