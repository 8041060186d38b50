//! SMTP delivery of late loan notifications

use crate::config::MailConfig;
use crate::ports::notification_service::{NotificationService, Result};
use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::str::FromStr;

/// Subject line of every late loan notification
pub const LATE_LOAN_SUBJECT: &str = "Late book loan";

/// NotificationService backed by an SMTP relay
///
/// One message per call; recipients go in Bcc so customers never see each
/// other's addresses.
#[derive(Clone)]
pub struct SmtpNotificationService {
    config: MailConfig,
}

impl SmtpNotificationService {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build the message without sending it
    fn build_message(&self, body: &str, recipients: &[String]) -> Result<Message> {
        let from = Mailbox::from_str(&self.config.from)
            .map_err(|e| format!("Invalid from address: {}", e))?;

        let mut builder = Message::builder()
            .from(from.clone())
            .to(from)
            .subject(LATE_LOAN_SUBJECT)
            .header(ContentType::TEXT_PLAIN);

        for recipient in recipients {
            let mailbox = Mailbox::from_str(recipient)
                .map_err(|e| format!("Invalid recipient address {}: {}", recipient, e))?;
            builder = builder.bcc(mailbox);
        }

        Ok(builder
            .body(body.to_string())
            .map_err(|e| format!("Failed to build email: {}", e))?)
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let builder = match (&self.config.smtp_username, &self.config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl NotificationService for SmtpNotificationService {
    /// An empty recipient list sends nothing
    async fn send(&self, message: &str, recipients: &[String]) -> Result<()> {
        if recipients.is_empty() {
            tracing::debug!("No recipients for late loan notification; nothing to send");
            return Ok(());
        }

        let email = self.build_message(message, recipients)?;
        let mailer = self.transport()?;

        // SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await?
            .map_err(|e| format!("Failed to send email: {}", e))?;

        tracing::info!(
            recipients = recipients.len(),
            "Late loan notification sent via SMTP"
        );
        Ok(())
    }
}
