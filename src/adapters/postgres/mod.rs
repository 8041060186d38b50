pub mod book_store;
pub mod loan_store;

use crate::ports::StoreError;

// パブリックに型を再エクスポート
pub use book_store::BookStore as PostgresBookStore;
pub use loan_store::LoanStore as PostgresLoanStore;

/// 一意制約違反の SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

/// 外部キー制約違反の SQLSTATE
const FOREIGN_KEY_VIOLATION: &str = "23503";

const BOOKS_ISBN_CONSTRAINT: &str = "books_isbn_key";
const OUTSTANDING_LOAN_CONSTRAINT: &str = "loans_one_outstanding_per_book";

/// sqlxのエラーをストアのエラーに変換する
///
/// 一意制約違反は制約名から `IsbnConflict` / `ActiveLoanConflict` に、
/// 外部キー違反（存在しない書籍への貸出）は `NotFound` に読み替える。
pub(crate) fn map_sqlx_error(err: sqlx::Error, isbn: Option<&str>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return StoreError::NotFound;
        }
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            match db_err.constraint() {
                Some(BOOKS_ISBN_CONSTRAINT) => {
                    return StoreError::IsbnConflict(isbn.unwrap_or_default().to_string());
                }
                Some(OUTSTANDING_LOAN_CONSTRAINT) => return StoreError::ActiveLoanConflict,
                _ => {}
            }
        }
    }

    StoreError::Backend(Box::new(err))
}

/// ILIKE で使うワイルドカードをエスケープし、部分一致パターンを作る
pub(crate) fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
