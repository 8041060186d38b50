use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};

use super::super::ServiceDependencies;
use super::errors::{BookApplicationError, Result};

/// 書籍を登録する
///
/// ビジネスルール：
/// - ISBNは全書籍で一意
///
/// 先に存在確認を行い、重複していれば書き込まずに `DuplicateIsbn` を返す。
/// 確認と書き込みの間に別のリクエストが同じISBNを登録した場合も、
/// ストアの一意制約で検出して同じエラーにする。
pub async fn create_book(deps: &ServiceDependencies, book: Book) -> Result<Book> {
    let exists = deps
        .book_store
        .exists_by_isbn(&book.isbn)
        .await
        .map_err(BookApplicationError::StoreError)?;

    if exists {
        return Err(BookApplicationError::DuplicateIsbn);
    }

    let created = deps
        .book_store
        .insert(Book { id: None, ..book })
        .await
        .map_err(BookApplicationError::from_store)?;

    tracing::info!(isbn = %created.isbn, "book created");

    Ok(created)
}

/// IDで書籍を取得する
///
/// 見つからない場合はエラーではなく `None`。
pub async fn get_book_by_id(deps: &ServiceDependencies, id: BookId) -> Result<Option<Book>> {
    deps.book_store
        .get_by_id(id)
        .await
        .map_err(BookApplicationError::StoreError)
}

/// ISBNで書籍を取得する
pub async fn get_book_by_isbn(deps: &ServiceDependencies, isbn: &str) -> Result<Option<Book>> {
    deps.book_store
        .get_by_isbn(isbn)
        .await
        .map_err(BookApplicationError::StoreError)
}

/// 書籍を丸ごと置き換える
///
/// IDのない書籍は `InvalidArgument`（ストアには触れない）。
pub async fn update_book(deps: &ServiceDependencies, book: Book) -> Result<Book> {
    let id = book
        .id
        .ok_or(BookApplicationError::InvalidArgument("Book id is required"))?;

    deps.book_store
        .update(id, book)
        .await
        .map_err(BookApplicationError::from_store)
}

/// 書籍を削除する
///
/// IDのない書籍は `InvalidArgument`（ストアには触れない）。
pub async fn delete_book(deps: &ServiceDependencies, book: &Book) -> Result<()> {
    let id = book
        .id
        .ok_or(BookApplicationError::InvalidArgument("Book id is required"))?;

    deps.book_store
        .delete(id)
        .await
        .map_err(BookApplicationError::from_store)?;

    tracing::info!(book_id = %id, "book deleted");

    Ok(())
}

/// フィルタに一致する書籍を検索する
///
/// 指定されたフィールドだけを条件に、大文字小文字を区別しない部分一致のANDで絞り込む。
pub async fn find_books(
    deps: &ServiceDependencies,
    filter: BookFilter,
    page: PageRequest,
) -> Result<Page<Book>> {
    deps.book_store
        .find(&filter.normalized(), page)
        .await
        .map_err(BookApplicationError::StoreError)
}
