use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::StoreError;
use crate::ports::book_store::{BookStore, Result};
use async_trait::async_trait;

use super::InMemoryStore;

#[async_trait]
impl BookStore for InMemoryStore {
    /// Rejects a duplicate isbn under the same lock as the insert
    async fn insert(&self, book: Book) -> Result<Book> {
        let mut state = self.lock()?;

        if state.books.iter().any(|existing| existing.isbn == book.isbn) {
            return Err(StoreError::IsbnConflict(book.isbn));
        }

        let created = book.with_id(BookId::new());
        state.books.push(created.clone());
        Ok(created)
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        Ok(self.lock()?.books.iter().any(|book| book.isbn == isbn))
    }

    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.lock()?.book(id).cloned())
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self
            .lock()?
            .books
            .iter()
            .find(|book| book.isbn == isbn)
            .cloned())
    }

    async fn update(&self, id: BookId, book: Book) -> Result<Book> {
        let mut state = self.lock()?;

        let isbn_taken = state
            .books
            .iter()
            .any(|existing| existing.id != Some(id) && existing.isbn == book.isbn);
        if isbn_taken {
            return Err(StoreError::IsbnConflict(book.isbn));
        }

        let slot = state
            .books
            .iter_mut()
            .find(|existing| existing.id == Some(id))
            .ok_or(StoreError::NotFound)?;

        *slot = book.with_id(id);
        Ok(slot.clone())
    }

    /// Also removes the book's loans
    async fn delete(&self, id: BookId) -> Result<()> {
        let mut state = self.lock()?;

        let before = state.books.len();
        state.books.retain(|book| book.id != Some(id));
        if state.books.len() == before {
            return Err(StoreError::NotFound);
        }

        state.loans.retain(|loan| loan.book_id != id);
        Ok(())
    }

    async fn find(&self, filter: &BookFilter, page: PageRequest) -> Result<Page<Book>> {
        let state = self.lock()?;

        let matches = state
            .books
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect();

        Ok(Page::slice(matches, page))
    }
}
