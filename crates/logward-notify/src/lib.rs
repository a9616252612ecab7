//! Logward Notify - Throttled fatal-event email notifications
//!
//! The gate decides *whether* and *when* an alert goes out; delivery itself
//! sits behind the [`Mailer`] trait so transports can be swapped (or mocked).

mod error;
#[cfg(test)]
pub mod mock;
mod smtp;

pub use error::{NotifyError, Result};
pub use smtp::SmtpMailer;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use logward_core::{Formatter, SmtpSettings};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

/// A rendered notification email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub subject: String,
    pub html: String,
}

/// Capability to deliver a notification email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &Mail) -> Result<()>;
}

/// Transport, throttle clock, and settings behind one lock so the
/// check-and-record step is atomic across concurrent fatal calls.
struct GateInner {
    mailer: Option<Arc<dyn Mailer>>,
    throttle: Duration,
    client: String,
    debug: bool,
    last_sent: Option<Instant>,
}

/// Throttled decision point for fatal-event notifications.
///
/// Not ready when transport settings are absent or construction failed;
/// either way the host application keeps running and alerts are dropped.
pub struct AlertGate {
    inner: Mutex<GateInner>,
}

impl AlertGate {
    /// Build a gate from optional SMTP settings.
    ///
    /// Absent settings leave the gate permanently not-ready without error; a
    /// construction failure is reported once and also yields a not-ready
    /// gate.
    pub fn new(smtp: Option<&SmtpSettings>, throttle: Duration, client: &str, debug: bool) -> Self {
        Self {
            inner: Mutex::new(GateInner {
                mailer: build_mailer(smtp, client, debug),
                throttle,
                client: client.to_string(),
                debug,
                last_sent: None,
            }),
        }
    }

    /// Build a gate around a custom transport
    pub fn with_mailer(
        mailer: Arc<dyn Mailer>,
        throttle: Duration,
        client: &str,
        debug: bool,
    ) -> Self {
        Self {
            inner: Mutex::new(GateInner {
                mailer: Some(mailer),
                throttle,
                client: client.to_string(),
                debug,
                last_sent: None,
            }),
        }
    }

    /// Whether settings were present and transport construction succeeded
    pub fn ready(&self) -> bool {
        self.inner.lock().mailer.is_some()
    }

    /// Conditionally send a fatal-event notification.
    ///
    /// Fire-and-forget: the send runs as a detached task and its failure is
    /// reported, never retried, and never surfaced to the caller. The
    /// last-sent timestamp is recorded before delivery starts, so a slow or
    /// failing send cannot let a burst of fatal events through the throttle.
    pub fn notify(&self, code: &str, caller: &str, message: &str) {
        let mut inner = self.inner.lock();

        let Some(mailer) = inner.mailer.clone() else {
            error!("Cannot send notification: mailer not initialized");
            return;
        };

        let now = Instant::now();
        if let Some(last) = inner.last_sent {
            let elapsed = now.duration_since(last);
            if elapsed < inner.throttle {
                if inner.debug {
                    debug!(
                        "Notification throttled, {:?} remaining",
                        inner.throttle - elapsed
                    );
                }
                return;
            }
        }
        inner.last_sent = Some(now);

        let formatter = Formatter::new(inner.client.clone());
        let mail = Mail {
            subject: formatter.email_subject(code),
            html: formatter.email_body(code, caller, message),
        };
        let verbose = inner.debug;
        drop(inner);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match mailer.send(&mail).await {
                        Ok(()) => {
                            if verbose {
                                debug!("Notification email sent");
                            }
                        }
                        Err(e) => error!("Failed to send notification email: {}", e),
                    }
                });
            }
            Err(_) => warn!("No async runtime available, dropping notification"),
        }
    }

    /// Replace settings, discard the existing transport, and rebuild it.
    ///
    /// The throttle clock survives, so reconfiguring cannot defeat it.
    pub fn reconfigure(
        &self,
        smtp: Option<&SmtpSettings>,
        throttle: Duration,
        client: &str,
        debug: bool,
    ) {
        let mailer = build_mailer(smtp, client, debug);

        let mut inner = self.inner.lock();
        inner.mailer = mailer;
        inner.throttle = throttle;
        inner.client = client.to_string();
        inner.debug = debug;
    }
}

fn build_mailer(
    smtp: Option<&SmtpSettings>,
    client: &str,
    debug: bool,
) -> Option<Arc<dyn Mailer>> {
    let settings = match smtp {
        Some(settings) => settings,
        None => {
            if debug {
                debug!("SMTP not configured, notifications disabled");
            }
            return None;
        }
    };

    match SmtpMailer::new(settings, client) {
        Ok(mailer) => {
            if debug {
                debug!("SMTP transport initialized");
            }
            Some(Arc::new(mailer))
        }
        Err(e) => {
            error!("Failed to initialize SMTP transport: {}", e);
            None
        }
    }
}
