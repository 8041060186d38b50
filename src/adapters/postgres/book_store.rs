use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::StoreError;
use crate::ports::book_store::{BookStore as BookStoreTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};

use super::{contains_pattern, map_sqlx_error};

/// PostgreSQLの行データをBookに変換する
fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        id: Some(BookId::from_uuid(row.get("id"))),
        title: row.get("title"),
        author: row.get("author"),
        isbn: row.get("isbn"),
    }
}

/// フィルタのWHERE句を組み立てる
///
/// 指定されたフィールドごとに ILIKE の部分一致条件をANDで追加する。
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    let conditions = [
        ("title", filter.title.as_deref()),
        ("author", filter.author.as_deref()),
        ("isbn", filter.isbn.as_deref()),
    ];

    let mut first = true;
    for (column, value) in conditions {
        let Some(value) = value else { continue };
        qb.push(if first { " WHERE " } else { " AND " });
        qb.push(column);
        qb.push(" ILIKE ");
        qb.push_bind(contains_pattern(value));
        first = false;
    }
}

/// BookStoreのPostgreSQL実装
///
/// ISBNの一意性は books_isbn_key 制約で保証する。
pub struct BookStore {
    pool: PgPool,
}

impl BookStore {
    /// PostgreSQLコネクションプールから新しいBookStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStoreTrait for BookStore {
    async fn insert(&self, book: Book) -> Result<Book> {
        let id = BookId::new();

        let row = sqlx::query(
            r#"
            INSERT INTO books (id, title, author, isbn)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(id.value())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, Some(&book.isbn)))?;

        Ok(map_row_to_book(&row))
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))
    }

    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT id, title, author, isbn FROM books WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT id, title, author, isbn FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn update(&self, id: BookId, book: Book) -> Result<Book> {
        let row = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4
            WHERE id = $1
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(id.value())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, Some(&book.isbn)))?;

        row.as_ref().map(map_row_to_book).ok_or(StoreError::NotFound)
    }

    /// 貸出は外部キーの ON DELETE CASCADE で一緒に削除される
    async fn delete(&self, id: BookId) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find(&self, filter: &BookFilter, page: PageRequest) -> Result<Page<Book>> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT id, title, author, isbn FROM books");
        push_filter(&mut query, filter);
        query.push(" ORDER BY created_at, id LIMIT ");
        query.push_bind(i64::from(page.size()));
        query.push(" OFFSET ");
        query.push_bind(page.offset() as i64);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

        Ok(Page::new(
            rows.iter().map(map_row_to_book).collect(),
            page,
            total.max(0) as u64,
        ))
    }
}
