mod book_service;
mod errors;

pub use book_service::{
    create_book, delete_book, find_books, get_book_by_id, get_book_by_isbn, update_book,
};
pub use errors::{BookApplicationError, Result};
