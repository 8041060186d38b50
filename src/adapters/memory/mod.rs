mod book_store;
mod loan_store;

use crate::domain::{Book, BookId, Loan, LoanId, ReturnStatus};
use crate::ports::StoreError;
use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard};

/// In-memory implementation of BookStore and LoanStore
///
/// Books and loans live behind one lock, so every check-and-write sequence
/// (isbn uniqueness, one outstanding loan per book) is atomic.
/// Records keep insertion order, which is also the listing order.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    books: Vec<Book>,
    loans: Vec<LoanRecord>,
}

/// Loan row as stored; the book is joined on read.
#[derive(Debug, Clone)]
struct LoanRecord {
    id: LoanId,
    book_id: BookId,
    customer: String,
    customer_email: Option<String>,
    loan_date: NaiveDate,
    returned: ReturnStatus,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::backend("in-memory store lock poisoned"))
    }
}

impl State {
    fn book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == Some(id))
    }

    fn join(&self, record: &LoanRecord) -> Result<Loan, StoreError> {
        let book = self.book(record.book_id).cloned().ok_or_else(|| {
            StoreError::backend(format!("loan {} references a missing book", record.id))
        })?;

        Ok(Loan {
            id: record.id,
            book,
            customer: record.customer.clone(),
            customer_email: record.customer_email.clone(),
            loan_date: record.loan_date,
            returned: record.returned,
        })
    }

    fn has_outstanding_loan(&self, book_id: BookId, except: Option<LoanId>) -> bool {
        self.loans.iter().any(|loan| {
            loan.book_id == book_id && !loan.returned.is_returned() && Some(loan.id) != except
        })
    }
}
