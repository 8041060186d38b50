use thiserror::Error;

/// ストアポート共通のエラー
///
/// 一意性の違反はストアが書き込み時に検出し、型付きで返す。
#[derive(Debug, Error)]
pub enum StoreError {
    /// 同じISBNの書籍が既に存在する
    #[error("isbn already registered: {0}")]
    IsbnConflict(String),

    /// 書籍に未返却の貸出が既に存在する
    #[error("book already has an outstanding loan")]
    ActiveLoanConflict,

    /// 更新・削除対象のレコードが存在しない
    #[error("record not found")]
    NotFound,

    /// 永続化層の障害
    #[error("storage backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Backend(err.into())
    }
}
