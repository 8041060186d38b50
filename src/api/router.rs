use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_book, create_loan, delete_book, get_book, get_loan, list_books, list_loans,
    list_loans_by_book, return_loan, update_book,
};

/// Creates the API router with all book and loan endpoints
///
/// Books:
/// - POST /api/books, GET /api/books
/// - GET / PUT / DELETE /api/books/:id
/// - GET /api/books/:id/loans
///
/// Loans:
/// - POST /api/loans, GET /api/loans
/// - GET / PATCH /api/loans/:id
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/api/books/:id/loans", get(list_loans_by_book))
        .route("/api/loans", get(list_loans).post(create_loan))
        .route("/api/loans/:id", get(get_loan).patch(return_loan))
        // Add tracing middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
