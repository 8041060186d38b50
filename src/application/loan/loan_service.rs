use crate::domain::{self, Book, Loan, LoanFilter, LoanId, Page, PageRequest, commands::CreateLoan};
use crate::ports::StoreError;
use chrono::NaiveDate;

use super::super::ServiceDependencies;
use super::errors::{LoanApplicationError, Result};

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍に未返却の貸出がないこと
/// - 貸出日は当日、返却状態は未決定
///
/// # 一貫性保証
///
/// 存在確認の後に書き込むが、同じ書籍への同時リクエストは
/// ストアの書き込み時の検査（部分一意インデックス / ロック）で弾かれ、
/// どちらの経路でも `BookAlreadyLoaned` になる。
///
/// # エラー
/// - InvalidArgument: 書籍にIDがない
/// - BookAlreadyLoaned: 未返却の貸出がある
/// - BookNotFound: 書き込みまでに書籍が削除された
pub async fn create_loan(deps: &ServiceDependencies, cmd: CreateLoan) -> Result<Loan> {
    // 1. 書籍の識別子を確認
    let book_id = cmd
        .book
        .id
        .ok_or(LoanApplicationError::InvalidArgument("Book id is required"))?;

    // 2. 未返却の貸出がないか確認
    let already_loaned = deps
        .loan_store
        .exists_outstanding_for_book(book_id)
        .await
        .map_err(LoanApplicationError::StoreError)?;

    if already_loaned {
        return Err(LoanApplicationError::BookAlreadyLoaned);
    }

    // 3. ドメイン層の純粋関数で貸出を組み立てる
    let new_loan = domain::loan::new_loan(book_id, cmd.customer, cmd.customer_email, cmd.loaned_on);

    // 4. 保存
    let loan = deps
        .loan_store
        .insert(new_loan)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => LoanApplicationError::BookNotFound,
            other => LoanApplicationError::from_store(other),
        })?;

    tracing::info!(loan_id = %loan.id, isbn = %loan.book.isbn, "loan created");

    Ok(loan)
}

/// IDで貸出を取得する
pub async fn get_loan_by_id(deps: &ServiceDependencies, id: LoanId) -> Result<Option<Loan>> {
    deps.loan_store
        .get_by_id(id)
        .await
        .map_err(LoanApplicationError::StoreError)
}

/// 貸出を丸ごと置き換える
///
/// 返却の記録（returned の設定）に使用される。
pub async fn update_loan(deps: &ServiceDependencies, loan: Loan) -> Result<Loan> {
    let updated = deps
        .loan_store
        .update(loan)
        .await
        .map_err(LoanApplicationError::from_store)?;

    tracing::info!(loan_id = %updated.id, returned = ?updated.returned, "loan updated");

    Ok(updated)
}

/// ISBN または 借り手で貸出を検索する
pub async fn find_loans(
    deps: &ServiceDependencies,
    filter: LoanFilter,
    page: PageRequest,
) -> Result<Page<Loan>> {
    deps.loan_store
        .find(&filter.normalized(), page)
        .await
        .map_err(LoanApplicationError::StoreError)
}

/// 書籍の貸出履歴を取得する
pub async fn get_loans_by_book(
    deps: &ServiceDependencies,
    book: &Book,
    page: PageRequest,
) -> Result<Page<Loan>> {
    let book_id = book
        .id
        .ok_or(LoanApplicationError::InvalidArgument("Book id is required"))?;

    deps.loan_store
        .find_by_book(book_id, page)
        .await
        .map_err(LoanApplicationError::StoreError)
}

/// 延滞中の貸出をすべて取得する
///
/// 返却済みでなく、貸出日が `today - 4日` より前の貸出。ページングなし。
pub async fn get_all_late_loans(deps: &ServiceDependencies, today: NaiveDate) -> Result<Vec<Loan>> {
    let cutoff = domain::loan::overdue_cutoff(today);

    let loans = deps
        .loan_store
        .find_not_returned_before(cutoff)
        .await
        .map_err(LoanApplicationError::StoreError)?;

    // ストアの条件とドメインの判定を一致させる
    Ok(loans
        .into_iter()
        .filter(|loan| domain::loan::is_overdue(loan, today))
        .collect())
}
