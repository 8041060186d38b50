use crate::application::{ServiceDependencies, book, loan};
use crate::domain::{Book, BookId, LoanId, ReturnStatus, commands::CreateLoan};
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    types::{
        BookRequest, BookResponse, ListBooksQuery, ListLoansQuery, LoanCreatedResponse,
        LoanRequest, LoanResponse, PageQuery, PageResponse, ReturnedLoanRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// IDで書籍を取得し、なければ404
async fn find_book(state: &AppState, id: Uuid) -> Result<Book, ApiError> {
    book::get_book_by_id(&state.service_deps, BookId::from_uuid(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Book {} not found", id)))
}

// ============================================================================
// Book handlers
// ============================================================================

/// POST /api/books - 書籍を登録
///
/// 強制されるビジネスルール:
/// - title, author, isbn が空でないこと
/// - isbn が未登録であること
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    req.validate()?;
    tracing::info!(isbn = %req.isbn, "creating a book");

    let created = book::create_book(
        &state.service_deps,
        Book::new(req.title, req.author, req.isbn),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(created))))
}

/// GET /api/books/:id - 書籍詳細をIDで取得
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let found = find_book(&state, id).await?;
    Ok(Json(BookResponse::from(found)))
}

/// DELETE /api/books/:id - 書籍を削除
///
/// 書籍の貸出も一緒に削除される。
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let found = find_book(&state, id).await?;
    book::delete_book(&state.service_deps, &found).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/books/:id - 書籍を更新
///
/// title と author のみ置き換える。isbn は作成後に変更しない。
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    req.validate()?;

    let mut found = find_book(&state, id).await?;
    found.title = req.title;
    found.author = req.author;

    let updated = book::update_book(&state.service_deps, found).await?;
    Ok(Json(BookResponse::from(updated)))
}

/// GET /api/books - 書籍検索
///
/// クエリパラメータ:
/// - title, author, isbn: 部分一致（大文字小文字を区別しない、AND）
/// - page, size: ページ番号（0始まり）とページサイズ
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListBooksQuery>,
) -> Result<Json<PageResponse<BookResponse>>, ApiError> {
    let page = book::find_books(&state.service_deps, query.filter(), query.page_request()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

/// GET /api/books/:id/loans - 書籍の貸出履歴
pub async fn list_loans_by_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<PageResponse<LoanResponse>>, ApiError> {
    let found = find_book(&state, id).await?;
    let page =
        loan::get_loans_by_book(&state.service_deps, &found, query.page_request()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

// ============================================================================
// Loan handlers
// ============================================================================

/// POST /api/loans - 新しい貸出を作成
///
/// 強制されるビジネスルール:
/// - isbn の書籍が存在すること
/// - 書籍に未返却の貸出がないこと
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoanRequest>,
) -> Result<(StatusCode, Json<LoanCreatedResponse>), ApiError> {
    let req = req.normalized();
    req.validate()?;

    let target = book::get_book_by_isbn(&state.service_deps, &req.isbn)
        .await?
        .ok_or(loan::LoanApplicationError::BookNotFound)?;

    let cmd = CreateLoan {
        book: target,
        customer: req.customer,
        customer_email: req.customer_email,
        loaned_on: chrono::Utc::now().date_naive(),
    };

    let created = loan::create_loan(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanCreatedResponse {
            id: created.id.value(),
        }),
    ))
}

/// GET /api/loans/:id - 貸出詳細をIDで取得
pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let found = loan::get_loan_by_id(&state.service_deps, LoanId::from_uuid(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Loan {} not found", id)))?;
    Ok(Json(LoanResponse::from(found)))
}

/// PATCH /api/loans/:id - 返却を記録
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ReturnedLoanRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let mut found = loan::get_loan_by_id(&state.service_deps, LoanId::from_uuid(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Loan {} not found", id)))?;

    found.returned = ReturnStatus::from(req.returned);
    let updated = loan::update_loan(&state.service_deps, found).await?;

    Ok(Json(LoanResponse::from(updated)))
}

/// GET /api/loans - 貸出検索
///
/// クエリパラメータ:
/// - isbn: 書籍のISBN（完全一致）
/// - customer: 借り手名（完全一致）
/// - page, size: ページ番号（0始まり）とページサイズ
///
/// isbn と customer は論理和。どちらも指定しない場合は全件。
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListLoansQuery>,
) -> Result<Json<PageResponse<LoanResponse>>, ApiError> {
    let page = loan::find_loans(&state.service_deps, query.filter(), query.page_request()).await?;
    Ok(Json(PageResponse::from_page(page)))
}
