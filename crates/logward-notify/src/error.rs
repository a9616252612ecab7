//! Error types for the notification channel

/// Notification error type
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP transport error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Mail build error: {0}")]
    MailError(#[from] lettre::error::Error),

    #[error("Invalid mailbox address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Mailer not configured")]
    NotConfigured,
}

/// Result type alias for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        NotifyError::ConfigError(msg.into())
    }
}
