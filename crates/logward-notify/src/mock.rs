//! Mock mail transport for testing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{NotifyError, Result};
use crate::{Mail, Mailer};

/// A mock mailer that records every mail handed to it
#[derive(Default)]
pub struct MockMailer {
    mails: Arc<Mutex<Vec<Mail>>>,
    call_count: AtomicUsize,
    should_fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock mailer whose sends always fail
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Number of times send was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// All recorded mails
    pub async fn mails(&self) -> Vec<Mail> {
        self.mails.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, mail: &Mail) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(NotifyError::config("Mock failure"));
        }

        self.mails.lock().await.push(mail.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(subject: &str) -> Mail {
        Mail {
            subject: subject.to_string(),
            html: "<p>body</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_mails() {
        let mailer = MockMailer::new();
        mailer.send(&mail("one")).await.unwrap();
        mailer.send(&mail("two")).await.unwrap();

        assert_eq!(mailer.call_count(), 2);
        let mails = mailer.mails().await;
        assert_eq!(mails.len(), 2);
        assert_eq!(mails[0].subject, "one");
    }

    #[tokio::test]
    async fn test_failing_mock_counts_calls() {
        let mailer = MockMailer::failing();
        assert!(mailer.send(&mail("one")).await.is_err());
        assert_eq!(mailer.call_count(), 1);
        assert!(mailer.mails().await.is_empty());
    }
}
