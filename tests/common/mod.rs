#![allow(dead_code)]

use async_trait::async_trait;
use library_api::adapters::memory::InMemoryStore;
use library_api::adapters::mock::NotificationService as MockNotificationService;
use library_api::application::ServiceDependencies;
use library_api::domain::{Book, BookFilter, BookId, Page, PageRequest};
use library_api::ports::book_store::{BookStore, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// テスト用の依存関係一式
pub struct TestContext {
    pub deps: ServiceDependencies,
    pub store: Arc<InMemoryStore>,
    pub notifications: Arc<MockNotificationService>,
}

/// インメモリストアと記録用の通知サービスで依存関係を組み立てる
pub fn memory_context() -> TestContext {
    context_with_notifications(Arc::new(MockNotificationService::new()))
}

pub fn context_with_notifications(notifications: Arc<MockNotificationService>) -> TestContext {
    let store = Arc::new(InMemoryStore::new());
    let deps = ServiceDependencies {
        book_store: store.clone(),
        loan_store: store.clone(),
        notification_service: notifications.clone(),
    };

    TestContext {
        deps,
        store,
        notifications,
    }
}

/// 書き込み回数を数えるBookStore
///
/// `stale_isbn_check` を有効にすると存在確認が常に false を返し、
/// 確認と書き込みの間に別のリクエストが割り込んだ状況を再現する。
pub struct SpyBookStore {
    inner: InMemoryStore,
    writes: AtomicUsize,
    stale_isbn_check: bool,
}

impl SpyBookStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            writes: AtomicUsize::new(0),
            stale_isbn_check: false,
        }
    }

    pub fn with_stale_isbn_check() -> Self {
        Self {
            stale_isbn_check: true,
            ..Self::new()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookStore for SpyBookStore {
    async fn insert(&self, book: Book) -> Result<Book> {
        self.record_write();
        self.inner.insert(book).await
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        if self.stale_isbn_check {
            return Ok(false);
        }
        self.inner.exists_by_isbn(isbn).await
    }

    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        self.inner.get_by_isbn(isbn).await
    }

    async fn update(&self, id: BookId, book: Book) -> Result<Book> {
        self.record_write();
        self.inner.update(id, book).await
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        self.record_write();
        self.inner.delete(id).await
    }

    async fn find(&self, filter: &BookFilter, page: PageRequest) -> Result<Page<Book>> {
        self.inner.find(filter, page).await
    }
}

/// SpyBookStoreを使う依存関係
pub fn spy_deps(spy: Arc<SpyBookStore>) -> ServiceDependencies {
    ServiceDependencies {
        book_store: spy,
        loan_store: Arc::new(InMemoryStore::new()),
        notification_service: Arc::new(MockNotificationService::new()),
    }
}
