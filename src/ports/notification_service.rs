use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知サービスポート
///
/// 借り手への通知配信メカニズムを抽象化する。
/// 再送もキューイングも行わない。失敗はそのまま呼び出し元に返す。
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 同じ本文を宛先リスト全員に1回で送信する
    async fn send(&self, message: &str, recipients: &[String]) -> Result<()>;
}
