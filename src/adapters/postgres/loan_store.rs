use crate::domain::{
    Book, BookId, Loan, LoanFilter, LoanId, NewLoan, Page, PageRequest, ReturnStatus,
};
use crate::ports::StoreError;
use crate::ports::loan_store::{LoanStore as LoanStoreTrait, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};

use super::map_sqlx_error;

/// 貸出と書籍を結合したSELECT句
const SELECT_LOAN: &str = r#"
    SELECT
        l.id,
        l.customer,
        l.customer_email,
        l.loan_date,
        l.returned,
        b.id AS book_id,
        b.title,
        b.author,
        b.isbn
    FROM loans l
    JOIN books b ON b.id = l.book_id
"#;

/// PostgreSQLの行データをLoanに変換する
///
/// returned は NULL / TRUE / FALSE の三値を ReturnStatus に変換する。
fn map_row_to_loan(row: &PgRow) -> Loan {
    Loan {
        id: LoanId::from_uuid(row.get("id")),
        book: Book {
            id: Some(BookId::from_uuid(row.get("book_id"))),
            title: row.get("title"),
            author: row.get("author"),
            isbn: row.get("isbn"),
        },
        customer: row.get("customer"),
        customer_email: row.get("customer_email"),
        loan_date: row.get("loan_date"),
        returned: ReturnStatus::from_flag(row.get("returned")),
    }
}

/// LoanStoreのPostgreSQL実装
///
/// 1冊に未返却の貸出は1件までという不変条件を
/// 部分一意インデックス loans_one_outstanding_per_book で保証する。
pub struct LoanStore {
    pool: PgPool,
}

impl LoanStore {
    /// PostgreSQLコネクションプールから新しいLoanStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 範囲に一致する貸出を1ページ分取得する
    async fn fetch_page(&self, scope: Scope<'_>, page: PageRequest) -> Result<Page<Loan>> {
        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM loans l JOIN books b ON b.id = l.book_id",
        );
        scope.push_where(&mut count_query);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT_LOAN);
        scope.push_where(&mut query);
        query.push(" ORDER BY l.created_at, l.id LIMIT ");
        query.push_bind(i64::from(page.size()));
        query.push(" OFFSET ");
        query.push_bind(page.offset() as i64);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        Ok(Page::new(
            rows.iter().map(map_row_to_loan).collect(),
            page,
            total.max(0) as u64,
        ))
    }
}

/// ページ取得の対象範囲
enum Scope<'a> {
    /// ISBN または 借り手の完全一致（論理和）。どちらもなければ全件
    Filter(&'a LoanFilter),
    /// 1冊の書籍の貸出
    Book(BookId),
}

impl Scope<'_> {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Scope::Filter(filter) => {
                let conditions = [
                    ("b.isbn", filter.isbn.clone()),
                    ("l.customer", filter.customer.clone()),
                ];

                let mut first = true;
                for (column, value) in conditions {
                    let Some(value) = value else { continue };
                    qb.push(if first { " WHERE " } else { " OR " });
                    qb.push(column);
                    qb.push(" = ");
                    qb.push_bind(value);
                    first = false;
                }
            }
            Scope::Book(book_id) => {
                qb.push(" WHERE l.book_id = ");
                qb.push_bind(book_id.value());
            }
        }
    }
}

#[async_trait]
impl LoanStoreTrait for LoanStore {
    async fn insert(&self, loan: NewLoan) -> Result<Loan> {
        let id = LoanId::new();

        let row = sqlx::query(
            r#"
            WITH l AS (
                INSERT INTO loans (id, book_id, customer, customer_email, loan_date, returned)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT
                l.id,
                l.customer,
                l.customer_email,
                l.loan_date,
                l.returned,
                b.id AS book_id,
                b.title,
                b.author,
                b.isbn
            FROM l
            JOIN books b ON b.id = l.book_id
            "#,
        )
        .bind(id.value())
        .bind(loan.book_id.value())
        .bind(&loan.customer)
        .bind(&loan.customer_email)
        .bind(loan.loan_date)
        .bind(loan.returned.as_flag())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, None))?;

        Ok(map_row_to_loan(&row))
    }

    async fn exists_outstanding_for_book(&self, book_id: BookId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM loans WHERE book_id = $1 AND returned IS NOT TRUE)",
        )
        .bind(book_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, None))
    }

    async fn get_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        let sql = format!("{} WHERE l.id = $1", SELECT_LOAN);
        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    async fn update(&self, loan: Loan) -> Result<Loan> {
        let book_id = loan
            .book_id()
            .ok_or_else(|| StoreError::backend("loan book has no id"))?;

        let row = sqlx::query(
            r#"
            WITH l AS (
                UPDATE loans
                SET book_id = $2,
                    customer = $3,
                    customer_email = $4,
                    loan_date = $5,
                    returned = $6
                WHERE id = $1
                RETURNING *
            )
            SELECT
                l.id,
                l.customer,
                l.customer_email,
                l.loan_date,
                l.returned,
                b.id AS book_id,
                b.title,
                b.author,
                b.isbn
            FROM l
            JOIN books b ON b.id = l.book_id
            "#,
        )
        .bind(loan.id.value())
        .bind(book_id.value())
        .bind(&loan.customer)
        .bind(&loan.customer_email)
        .bind(loan.loan_date)
        .bind(loan.returned.as_flag())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, None))?;

        row.as_ref().map(map_row_to_loan).ok_or(StoreError::NotFound)
    }

    async fn find(&self, filter: &LoanFilter, page: PageRequest) -> Result<Page<Loan>> {
        self.fetch_page(Scope::Filter(filter), page).await
    }

    async fn find_by_book(&self, book_id: BookId, page: PageRequest) -> Result<Page<Loan>> {
        self.fetch_page(Scope::Book(book_id), page).await
    }

    async fn find_not_returned_before(&self, cutoff: NaiveDate) -> Result<Vec<Loan>> {
        let sql = format!(
            "{} WHERE l.returned IS NOT TRUE AND l.loan_date < $1 ORDER BY l.loan_date, l.id",
            SELECT_LOAN
        );
        let rows = sqlx::query(&sql)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        Ok(rows.iter().map(map_row_to_loan).collect())
    }
}
