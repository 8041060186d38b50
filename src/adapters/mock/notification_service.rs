use crate::ports::notification_service::{NotificationService as NotificationServiceTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// A notification captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub message: String,
    pub recipients: Vec<String>,
}

/// Mock implementation of NotificationService
///
/// Does not send actual notifications.
/// Records every call so tests can assert on what was dispatched.
/// Can be configured to fail for error propagation tests.
#[derive(Default)]
pub struct NotificationService {
    sent: Mutex<Vec<SentNotification>>,
    failure: Option<String>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that fails every send with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Notifications recorded so far
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn send(&self, message: &str, recipients: &[String]) -> Result<()> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone().into());
        }

        self.sent
            .lock()
            .map_err(|_| "mock notification lock poisoned")?
            .push(SentNotification {
                message: message.to_string(),
                recipients: recipients.to_vec(),
            });
        Ok(())
    }
}
