//! SMTP mail transport

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use logward_core::SmtpSettings;
use tracing::debug;

use crate::error::{NotifyError, Result};
use crate::{Mail, Mailer};

/// Delivers notification emails over SMTP
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpMailer {
    /// Build the transport and parse all addresses up front.
    ///
    /// The secure flag (or port 465 when the flag is absent) selects implicit
    /// TLS; otherwise the connection upgrades via STARTTLS. No connection is
    /// opened here.
    pub fn new(settings: &SmtpSettings, client: &str) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| NotifyError::config(e.to_string()))?;

        let builder = if settings.effective_secure() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        // The client name becomes the sender display name
        let from = Mailbox::new(Some(client.to_string()), settings.from.parse()?);
        let to = settings
            .to
            .iter()
            .map(|addr| addr.parse::<Mailbox>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { transport, from, to })
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &Mail) -> Result<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_HTML);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }
        let message = builder.body(mail.html.clone())?;

        self.transport.send(message).await?;
        debug!(
            "Notification email delivered to {} recipient(s)",
            self.to.len()
        );
        Ok(())
    }
}
