use crate::domain::{BookId, Loan, LoanFilter, LoanId, NewLoan, Page, PageRequest};
use crate::ports::StoreError;
use crate::ports::loan_store::{LoanStore, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{InMemoryStore, LoanRecord};

#[async_trait]
impl LoanStore for InMemoryStore {
    /// Rejects a second outstanding loan under the same lock as the insert
    async fn insert(&self, loan: NewLoan) -> Result<Loan> {
        let mut state = self.lock()?;

        if state.book(loan.book_id).is_none() {
            return Err(StoreError::NotFound);
        }
        if !loan.returned.is_returned() && state.has_outstanding_loan(loan.book_id, None) {
            return Err(StoreError::ActiveLoanConflict);
        }

        let record = LoanRecord {
            id: LoanId::new(),
            book_id: loan.book_id,
            customer: loan.customer,
            customer_email: loan.customer_email,
            loan_date: loan.loan_date,
            returned: loan.returned,
        };
        let created = state.join(&record)?;
        state.loans.push(record);
        Ok(created)
    }

    async fn exists_outstanding_for_book(&self, book_id: BookId) -> Result<bool> {
        Ok(self.lock()?.has_outstanding_loan(book_id, None))
    }

    async fn get_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        let state = self.lock()?;
        state
            .loans
            .iter()
            .find(|loan| loan.id == id)
            .map(|record| state.join(record))
            .transpose()
    }

    async fn update(&self, loan: Loan) -> Result<Loan> {
        let mut state = self.lock()?;

        let book_id = loan
            .book_id()
            .ok_or_else(|| StoreError::backend("loan book has no id"))?;
        if state.book(book_id).is_none() {
            return Err(StoreError::NotFound);
        }
        if !loan.returned.is_returned() && state.has_outstanding_loan(book_id, Some(loan.id)) {
            return Err(StoreError::ActiveLoanConflict);
        }

        let slot = state
            .loans
            .iter_mut()
            .find(|record| record.id == loan.id)
            .ok_or(StoreError::NotFound)?;

        *slot = LoanRecord {
            id: loan.id,
            book_id,
            customer: loan.customer,
            customer_email: loan.customer_email,
            loan_date: loan.loan_date,
            returned: loan.returned,
        };
        let record = slot.clone();
        state.join(&record)
    }

    async fn find(&self, filter: &LoanFilter, page: PageRequest) -> Result<Page<Loan>> {
        let state = self.lock()?;

        let loans = state
            .loans
            .iter()
            .map(|record| state.join(record))
            .collect::<Result<Vec<_>>>()?;
        let matches = loans.into_iter().filter(|loan| filter.matches(loan)).collect();

        Ok(Page::slice(matches, page))
    }

    async fn find_by_book(&self, book_id: BookId, page: PageRequest) -> Result<Page<Loan>> {
        let state = self.lock()?;

        let matches = state
            .loans
            .iter()
            .filter(|record| record.book_id == book_id)
            .map(|record| state.join(record))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::slice(matches, page))
    }

    async fn find_not_returned_before(&self, cutoff: NaiveDate) -> Result<Vec<Loan>> {
        let state = self.lock()?;

        state
            .loans
            .iter()
            .filter(|record| !record.returned.is_returned() && record.loan_date < cutoff)
            .map(|record| state.join(record))
            .collect()
    }
}
