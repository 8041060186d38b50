pub mod book_store;
pub mod loan_store;
pub mod notification_service;
pub mod store_error;

pub use book_store::BookStore;
pub use loan_store::LoanStore;
pub use notification_service::NotificationService;
pub use store_error::StoreError;
