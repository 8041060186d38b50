use serde::{Deserialize, Serialize};

use super::BookId;

/// Book集約 - カタログ上の1冊
///
/// 不変条件：
/// - title, author, isbn は空でない
/// - isbn はすべての書籍の中で一意（ストアが保証する）
/// - isbn は作成後に変更しない
///
/// `id` は永続化時に採番される。未保存の書籍は `None` を持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl Book {
    /// 未保存の書籍を作成する
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    pub fn with_id(self, id: BookId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// 書籍検索フィルタ
///
/// 値が入っているフィールドだけを条件とし、すべてをANDで結合する。
/// 文字列は大文字小文字を区別しない部分一致で比較する。
/// 空文字列は未指定と同じ扱い。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFilter {
    /// 空文字列を取り除いたフィルタを返す
    pub fn normalized(self) -> Self {
        Self {
            title: non_empty(self.title),
            author: non_empty(self.author),
            isbn: non_empty(self.isbn),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        contains_ignore_case(&book.title, self.title.as_deref())
            && contains_ignore_case(&book.author, self.author.as_deref())
            && contains_ignore_case(&book.isbn, self.isbn.as_deref())
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) if needle.is_empty() => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}
