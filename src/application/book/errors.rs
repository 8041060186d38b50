use crate::ports::StoreError;
use thiserror::Error;

/// 書籍管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookApplicationError {
    /// 同じISBNの書籍が既に登録されている
    #[error("Isbn already registered")]
    DuplicateIsbn,

    /// 必須の識別子がない
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// 書籍が見つからない
    #[error("Book not found")]
    BookNotFound,

    /// ストアのエラー
    #[error("Book store error")]
    StoreError(#[source] StoreError),
}

impl BookApplicationError {
    /// ストアのエラーをビジネスエラーに読み替える
    pub(super) fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::IsbnConflict(_) => BookApplicationError::DuplicateIsbn,
            StoreError::NotFound => BookApplicationError::BookNotFound,
            other => BookApplicationError::StoreError(other),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookApplicationError>;
