pub mod log_notification_service;
pub mod smtp_notification_service;

pub use log_notification_service::LogNotificationService;
pub use smtp_notification_service::SmtpNotificationService;
