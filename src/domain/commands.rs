use chrono::NaiveDate;

use super::Book;

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLoan {
    pub book: Book,
    pub customer: String,
    pub customer_email: Option<String>,
    pub loaned_on: NaiveDate,
}
