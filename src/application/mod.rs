pub mod book;
pub mod loan;

use crate::ports::*;
use std::sync::Arc;

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// アプリケーション層の関数にそのまま渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_store: Arc<dyn BookStore>,
    pub loan_store: Arc<dyn LoanStore>,
    pub notification_service: Arc<dyn NotificationService>,
}
