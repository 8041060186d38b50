use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Book, BookId, LoanId, ReturnStatus, book::non_empty};

/// 延滞とみなすまでの日数
///
/// 貸出日が「今日 - 4日」より前で、返却済みでない貸出が延滞。
pub const OVERDUE_THRESHOLD_DAYS: i64 = 4;

/// Loan集約 - 1冊の書籍の1回の貸出
///
/// 書籍は読み取り時点の内容で埋め込まれる（ストアが結合して返す）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    pub id: LoanId,

    // 貸し出された書籍
    pub book: Book,

    // 借り手
    pub customer: String,
    pub customer_email: Option<String>,

    // 貸出管理の責務
    pub loan_date: NaiveDate,
    pub returned: ReturnStatus,
}

impl Loan {
    /// 貸し出された書籍のID
    ///
    /// ストアから読み出した貸出では常に `Some`。
    pub fn book_id(&self) -> Option<BookId> {
        self.book.id
    }
}

/// 永続化前の貸出
///
/// IDはストアが採番する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub book_id: BookId,
    pub customer: String,
    pub customer_email: Option<String>,
    pub loan_date: NaiveDate,
    pub returned: ReturnStatus,
}

/// 純粋関数：新しい貸出を組み立てる
///
/// ビジネスルール：
/// - 貸出日は当日
/// - 返却状態は未決定（Outstanding）
pub fn new_loan(
    book_id: BookId,
    customer: String,
    customer_email: Option<String>,
    today: NaiveDate,
) -> NewLoan {
    NewLoan {
        book_id,
        customer,
        customer_email: non_empty(customer_email),
        loan_date: today,
        returned: ReturnStatus::Outstanding,
    }
}

/// 延滞判定の基準日
///
/// この日付より厳密に前の貸出日が延滞対象。
pub fn overdue_cutoff(today: NaiveDate) -> NaiveDate {
    today - Duration::days(OVERDUE_THRESHOLD_DAYS)
}

/// 純粋関数：貸出が延滞しているか判定する
pub fn is_overdue(loan: &Loan, today: NaiveDate) -> bool {
    !loan.returned.is_returned() && loan.loan_date < overdue_cutoff(today)
}

/// 貸出検索フィルタ
///
/// isbn（書籍のISBN完全一致）と customer（借り手名の完全一致）の論理和。
/// どちらも未指定なら絞り込まない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub isbn: Option<String>,
    pub customer: Option<String>,
}

impl LoanFilter {
    pub fn normalized(self) -> Self {
        Self {
            isbn: non_empty(self.isbn),
            customer: non_empty(self.customer),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.isbn.is_none() && self.customer.is_none()
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        if self.is_empty() {
            return true;
        }

        let isbn_matches = self.isbn.as_deref() == Some(loan.book.isbn.as_str());
        let customer_matches = self.customer.as_deref() == Some(loan.customer.as_str());

        isbn_matches || customer_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan_on(loan_date: NaiveDate, returned: ReturnStatus) -> Loan {
        Loan {
            id: LoanId::new(),
            book: Book::new("As aventuras", "Fulano", "123").with_id(BookId::new()),
            customer: "Fulano".to_string(),
            customer_email: Some("customer@email.com".to_string()),
            loan_date,
            returned,
        }
    }

    #[test]
    fn test_new_loan_starts_outstanding_on_today() {
        let today = day(2024, 3, 10);
        let book_id = BookId::new();

        let loan = new_loan(book_id, "Fulano".to_string(), None, today);

        assert_eq!(loan.book_id, book_id);
        assert_eq!(loan.loan_date, today);
        assert_eq!(loan.returned, ReturnStatus::Outstanding);
        assert_eq!(loan.customer_email, None);
    }

    #[test]
    fn test_new_loan_drops_blank_email() {
        let loan = new_loan(
            BookId::new(),
            "Fulano".to_string(),
            Some("".to_string()),
            day(2024, 3, 10),
        );
        assert_eq!(loan.customer_email, None);
    }

    #[test]
    fn test_overdue_cutoff_is_four_days_before_today() {
        assert_eq!(overdue_cutoff(day(2024, 3, 10)), day(2024, 3, 6));
        // 月をまたぐ場合
        assert_eq!(overdue_cutoff(day(2024, 3, 2)), day(2024, 2, 27));
    }

    // 境界：ちょうど4日前は延滞ではない
    #[test]
    fn test_loan_exactly_four_days_old_is_not_overdue() {
        let today = day(2024, 3, 10);
        let loan = loan_on(day(2024, 3, 6), ReturnStatus::Outstanding);
        assert!(!is_overdue(&loan, today));
    }

    #[test]
    fn test_loan_five_days_old_is_overdue() {
        let today = day(2024, 3, 10);
        let loan = loan_on(day(2024, 3, 5), ReturnStatus::Outstanding);
        assert!(is_overdue(&loan, today));
    }

    #[test]
    fn test_explicitly_not_returned_loan_can_be_overdue() {
        let today = day(2024, 3, 10);
        let loan = loan_on(day(2024, 3, 1), ReturnStatus::NotReturned);
        assert!(is_overdue(&loan, today));
    }

    #[test]
    fn test_returned_loan_is_never_overdue() {
        let today = day(2024, 3, 10);
        let loan = loan_on(day(2024, 1, 1), ReturnStatus::Returned);
        assert!(!is_overdue(&loan, today));
    }

    #[test]
    fn test_loan_filter_is_logical_or() {
        let loan = loan_on(day(2024, 3, 1), ReturnStatus::Outstanding);

        let by_isbn = LoanFilter {
            isbn: Some("123".to_string()),
            customer: Some("Someone else".to_string()),
        };
        assert!(by_isbn.matches(&loan));

        let by_customer = LoanFilter {
            isbn: Some("999".to_string()),
            customer: Some("Fulano".to_string()),
        };
        assert!(by_customer.matches(&loan));

        let neither = LoanFilter {
            isbn: Some("999".to_string()),
            customer: Some("Someone else".to_string()),
        };
        assert!(!neither.matches(&loan));
    }

    #[test]
    fn test_empty_loan_filter_matches_all() {
        let loan = loan_on(day(2024, 3, 1), ReturnStatus::Outstanding);
        let filter = LoanFilter {
            isbn: Some(String::new()),
            customer: None,
        }
        .normalized();
        assert!(filter.is_empty());
        assert!(filter.matches(&loan));
    }
}
