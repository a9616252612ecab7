//! Pure rendering helpers: timestamps, daily filenames, banners, log lines,
//! and notification email content.

use chrono::{Local, NaiveDate};

use crate::types::LogEntry;

/// Renders everything Logward writes. Holds no state beyond the client name.
#[derive(Debug, Clone)]
pub struct Formatter {
    client: String,
}

impl Formatter {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
        }
    }

    /// Current local timestamp in the form written to log lines
    pub fn timestamp(&self) -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    /// Daily log file name for a given date, e.g. `myapp_2026-08-05.txt`
    pub fn filename(&self, date: NaiveDate, ext: &str) -> String {
        format!("{}_{}.{}", self.client, date.format("%Y-%m-%d"), ext)
    }

    /// Separator banner appended once per rotation at the top of a new file
    pub fn separator(&self, date: NaiveDate) -> String {
        format!(
            "-------------------- [ {} | {} ] --------------------\n",
            self.client,
            date.format("%Y-%m-%d")
        )
    }

    /// Render a log entry as one plain-text line (newline-terminated)
    pub fn line(&self, entry: &LogEntry) -> String {
        format!(
            "[{}] [{}] [{}] [{}] : {}\n",
            entry.timestamp, entry.level, entry.code, entry.caller, entry.message
        )
    }

    /// Subject of a fatal-event notification email
    pub fn email_subject(&self, code: &str) -> String {
        format!("[{}] Error Alert - {}", self.client, code)
    }

    /// HTML body of a fatal-event notification email
    pub fn email_body(&self, code: &str, caller: &str, message: &str) -> String {
        let sent_at = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!(
            "<h2>Error Report</h2>\n\
             <p><strong>Client:</strong> {}</p>\n\
             <p><strong>Error Code:</strong> {}</p>\n\
             <p><strong>Module:</strong> {}</p>\n\
             <p><strong>Error Message:</strong> {}</p>\n\
             <p><strong>Timestamp:</strong> {}</p>\n\
             <hr>",
            self.client, code, caller, message, sent_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filename_encodes_client_and_date() {
        let fmt = Formatter::new("myapp");
        assert_eq!(fmt.filename(date(2026, 8, 5), "txt"), "myapp_2026-08-05.txt");
        assert_eq!(fmt.filename(date(2026, 1, 1), "json"), "myapp_2026-01-01.json");
    }

    #[test]
    fn test_separator_is_one_banner_line() {
        let fmt = Formatter::new("myapp");
        let sep = fmt.separator(date(2026, 8, 5));
        assert!(sep.starts_with("----"));
        assert!(sep.contains("myapp"));
        assert!(sep.contains("2026-08-05"));
        assert!(sep.ends_with('\n'));
        assert_eq!(sep.lines().count(), 1);
    }

    #[test]
    fn test_line_rendering() {
        let fmt = Formatter::new("myapp");
        let entry = LogEntry {
            level: Level::Error,
            timestamp: "2026-08-05 10:00:00.000".to_string(),
            code: "DB-07".to_string(),
            caller: "src/db.rs:120".to_string(),
            message: "connection lost".to_string(),
        };
        assert_eq!(
            fmt.line(&entry),
            "[2026-08-05 10:00:00.000] [ERROR] [DB-07] [src/db.rs:120] : connection lost\n"
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let fmt = Formatter::new("myapp");
        let ts = fmt.timestamp();
        // 2026-08-05 10:00:00.123
        assert_eq!(ts.len(), 23);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }

    #[test]
    fn test_email_subject() {
        let fmt = Formatter::new("myapp");
        assert_eq!(fmt.email_subject("DB-07"), "[myapp] Error Alert - DB-07");
    }

    #[test]
    fn test_email_body_contains_all_fields() {
        let fmt = Formatter::new("myapp");
        let body = fmt.email_body("DB-07", "src/db.rs:120", "connection lost");
        assert!(body.contains("myapp"));
        assert!(body.contains("DB-07"));
        assert!(body.contains("src/db.rs:120"));
        assert!(body.contains("connection lost"));
        assert!(body.contains("<h2>Error Report</h2>"));
    }
}
