use crate::ports::notification_service::{NotificationService, Result};
use async_trait::async_trait;

/// NotificationService used when mail delivery is disabled
///
/// Writes the notification to the log and keeps nothing in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationService;

impl LogNotificationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationService for LogNotificationService {
    async fn send(&self, message: &str, recipients: &[String]) -> Result<()> {
        tracing::info!(
            recipients = ?recipients,
            message,
            "Mail delivery disabled; late loan notification logged only"
        );
        Ok(())
    }
}
