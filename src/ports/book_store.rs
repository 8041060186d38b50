use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use async_trait::async_trait;

use super::store_error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// 書籍ストアポート
///
/// 書籍の永続化と検索を抽象化する。
#[async_trait]
pub trait BookStore: Send + Sync {
    /// 書籍を保存し、採番済みの書籍を返す
    ///
    /// 同じISBNが既に存在する場合は `StoreError::IsbnConflict`。
    /// 確認と書き込みはアトミックに行われる。
    async fn insert(&self, book: Book) -> Result<Book>;

    /// 指定したISBNの書籍が存在するか
    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool>;

    /// IDで書籍を取得する
    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// ISBNで書籍を取得する
    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;

    /// 書籍を丸ごと置き換える
    ///
    /// 存在しない場合は `StoreError::NotFound`。
    async fn update(&self, id: BookId, book: Book) -> Result<Book>;

    /// 書籍とその貸出を削除する
    ///
    /// 存在しない場合は `StoreError::NotFound`。
    async fn delete(&self, id: BookId) -> Result<()>;

    /// フィルタに一致する書籍を1ページ分返す
    async fn find(&self, filter: &BookFilter, page: PageRequest) -> Result<Page<Book>>;
}
