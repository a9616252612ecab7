//! Logward - Embeddable daily-rotating file logger with throttled email alerts
//!
//! Logward writes structured log lines to daily files, prunes old files
//! beyond a retention count, optionally echoes lines to the console, and
//! escalates fatal-level events to a throttled email channel. It is meant to
//! be linked into a host application; nothing in it ever raises back to the
//! caller, and failures degrade to dropped lines or dropped alerts.
//!
//! ```no_run
//! use logward::{Config, Logger};
//!
//! let mut config = Config::new("myapp");
//! config.console = true;
//!
//! let log = Logger::new(config);
//! log.info("BOOT-01", "service starting");
//! log.error("DB-07", "connection lost");
//! ```

mod logger;

pub use logger::Logger;
pub use logward_core::{
    Config, ConfigFormat, ConfigUpdate, Directories, Error, Formatter, Level, LogEntry, Result,
    Retention, SmtpSettings,
};
pub use logward_notify::{AlertGate, Mail, Mailer, NotifyError, SmtpMailer};
pub use logward_sink::{FileFormat, FileSink};
