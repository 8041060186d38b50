use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    Book, BookFilter, Loan, LoanFilter, Page, PageRequest, pagination::DEFAULT_PAGE_SIZE,
};

// ============================================================================
// Requests
// ============================================================================

/// 書籍の登録・更新リクエスト（POST /api/books, PUT /api/books/:id）
///
/// 欠けたフィールドは空文字列として受け取り、バリデーションで弾く。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
}

/// 貸出作成リクエスト（POST /api/loans）
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoanRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "customer must not be empty"))]
    pub customer: String,
    #[serde(default)]
    #[validate(email(message = "customer_email must be a valid e-mail"))]
    pub customer_email: Option<String>,
}

impl LoanRequest {
    /// 空白だけのメールアドレスは未指定として扱う
    pub fn normalized(self) -> Self {
        Self {
            customer_email: self.customer_email.filter(|email| !email.trim().is_empty()),
            ..self
        }
    }
}

/// 返却記録リクエスト（PATCH /api/loans/:id）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnedLoanRequest {
    pub returned: bool,
}

/// 書籍一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ListBooksQuery {
    pub fn filter(&self) -> BookFilter {
        BookFilter {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.size)
    }
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListLoansQuery {
    pub isbn: Option<String>,
    pub customer: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ListLoansQuery {
    pub fn filter(&self) -> LoanFilter {
        LoanFilter {
            isbn: self.isbn.clone(),
            customer: self.customer.clone(),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.size)
    }
}

/// ページ指定のみのクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.size)
    }
}

fn page_request(page: Option<u32>, size: Option<u32>) -> PageRequest {
    PageRequest::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE))
}

// ============================================================================
// Responses
// ============================================================================

/// 書籍レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookResponse {
    pub id: Option<Uuid>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map(|id| id.value()),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
        }
    }
}

/// 貸出レスポンス
///
/// returned は null（未決定） / true / false。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanResponse {
    pub id: Uuid,
    pub customer: String,
    pub customer_email: Option<String>,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
    pub book: BookResponse,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id.value(),
            customer: loan.customer,
            customer_email: loan.customer_email,
            loan_date: loan.loan_date,
            returned: loan.returned.as_flag(),
            book: BookResponse::from(loan.book),
        }
    }
}

/// 貸出作成レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCreatedResponse {
    pub id: Uuid,
}

/// ページングされた一覧レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        let total_pages = page.total_pages();
        Self {
            page: page.request.page(),
            size: page.request.size(),
            total_elements: page.total_elements,
            total_pages,
            content: page.content.into_iter().map(T::from).collect(),
        }
    }
}

/// エラーレスポンス
///
/// 1件以上のエラーメッセージを持つ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    pub fn many(errors: Vec<String>) -> Self {
        Self { errors }
    }
}
