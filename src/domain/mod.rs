pub mod book;
pub mod commands;
pub mod loan;
pub mod pagination;
pub mod value_objects;

pub use book::{Book, BookFilter};
pub use loan::{Loan, LoanFilter, NewLoan};
pub use pagination::{Page, PageRequest};
pub use value_objects::*;
