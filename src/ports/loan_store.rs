use crate::domain::{BookId, Loan, LoanFilter, LoanId, NewLoan, Page, PageRequest};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::store_error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// 貸出ストアポート
///
/// 返される `Loan` には参照先の書籍が結合されている。
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// 貸出を保存し、採番済みの貸出を返す
    ///
    /// 書籍に未返却の貸出が既にある場合は `StoreError::ActiveLoanConflict`。
    /// 書籍が存在しない場合は `StoreError::NotFound`。
    /// 確認と書き込みはアトミックに行われる。
    async fn insert(&self, loan: NewLoan) -> Result<Loan>;

    /// 書籍に返却済みでない貸出があるか
    async fn exists_outstanding_for_book(&self, book_id: BookId) -> Result<bool>;

    /// IDで貸出を取得する
    async fn get_by_id(&self, id: LoanId) -> Result<Option<Loan>>;

    /// 貸出を丸ごと置き換える
    ///
    /// 存在しない場合は `StoreError::NotFound`。
    /// 置き換えによって同じ書籍の未返却貸出が2件になる場合は
    /// `StoreError::ActiveLoanConflict`。
    async fn update(&self, loan: Loan) -> Result<Loan>;

    /// フィルタ（ISBN または 借り手）に一致する貸出を1ページ分返す
    async fn find(&self, filter: &LoanFilter, page: PageRequest) -> Result<Page<Loan>>;

    /// 書籍の貸出履歴を1ページ分返す
    async fn find_by_book(&self, book_id: BookId, page: PageRequest) -> Result<Page<Loan>>;

    /// 返却済みでなく、貸出日が `cutoff` より前の貸出をすべて返す
    ///
    /// 延滞通知バッチで使用される。
    async fn find_not_returned_before(&self, cutoff: NaiveDate) -> Result<Vec<Loan>>;
}
