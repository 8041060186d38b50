mod errors;
mod loan_service;
mod overdue_notification;

pub use errors::{LoanApplicationError, Result};
pub use loan_service::{
    create_loan, find_loans, get_all_late_loans, get_loan_by_id, get_loans_by_book, update_loan,
};
pub use overdue_notification::notify_late_loans;
