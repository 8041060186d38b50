use crate::ports::StoreError;
use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 書籍に未返却の貸出がある
    #[error("Book already loaned.")]
    BookAlreadyLoaned,

    /// 貸出対象の書籍が存在しない
    #[error("Book not found for passed isbn.")]
    BookNotFound,

    /// 必須の識別子がない
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// 貸出が見つからない
    #[error("Loan not found")]
    LoanNotFound,

    /// ストアのエラー
    #[error("Loan store error")]
    StoreError(#[source] StoreError),

    /// 通知サービスのエラー
    #[error("Notification service error")]
    NotificationError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoanApplicationError {
    /// ストアのエラーをビジネスエラーに読み替える
    pub(super) fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::ActiveLoanConflict => LoanApplicationError::BookAlreadyLoaned,
            StoreError::NotFound => LoanApplicationError::LoanNotFound,
            other => LoanApplicationError::StoreError(other),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
