//! Logger orchestration: leveled entry points over the sinks and the gate

use std::panic::Location;
use std::sync::Arc;

use logward_core::{Config, ConfigUpdate, Formatter, Level, LogEntry};
use logward_notify::{AlertGate, Mailer};
use logward_sink::{FileFormat, FileSink};
use parking_lot::RwLock;
use tracing::{debug, error};

/// The logging facility root.
///
/// Composes the daily file sinks and the notification gate behind leveled
/// entry points. Construction never fails: a sink or transport that cannot
/// come up leaves that component degraded (lines or alerts dropped, each
/// drop reported) while the host keeps running.
///
/// Log calls may arrive concurrently from multiple threads; each sink
/// serializes its own rotation check and write internally.
pub struct Logger {
    config: RwLock<Config>,
    text_sink: FileSink,
    json_sink: FileSink,
    gate: AlertGate,
}

impl Logger {
    pub fn new(config: Config) -> Self {
        let gate = AlertGate::new(
            config.smtp.as_ref(),
            config.throttle(),
            &config.client,
            config.debug,
        );
        Self::build(config, gate)
    }

    /// Build a logger around a custom mail transport
    pub fn with_mailer(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let gate = AlertGate::with_mailer(mailer, config.throttle(), &config.client, config.debug);
        Self::build(config, gate)
    }

    fn build(config: Config, gate: AlertGate) -> Self {
        if let Err(e) = config.validate() {
            error!("Logger configured with invalid settings: {}", e);
        }

        let text_sink = FileSink::new(
            &config.directory.text,
            &config.client,
            config.retain.text,
            FileFormat::Text,
        );
        let json_sink = FileSink::new(
            &config.directory.json,
            &config.client,
            config.retain.json,
            FileFormat::Json,
        );

        text_sink.initialize();
        if config.json {
            json_sink.initialize();
        }

        Self {
            config: RwLock::new(config),
            text_sink,
            json_sink,
            gate,
        }
    }

    /// Current configuration snapshot
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Whether the notification gate has a working transport
    pub fn notifications_ready(&self) -> bool {
        self.gate.ready()
    }

    #[track_caller]
    pub fn info(&self, code: &str, message: &str) {
        self.log(Level::Info, code, message, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, code: &str, message: &str) {
        self.log(Level::Warn, code, message, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, code: &str, message: &str) {
        self.log(Level::Debug, code, message, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, code: &str, message: &str) {
        self.log(Level::Error, code, message, Location::caller());
    }

    /// Log at FATAL and escalate to the notification channel.
    ///
    /// The escalation is fire-and-forget: throttling, a missing transport,
    /// and delivery failures are all reported diagnostics, never errors for
    /// the caller.
    #[track_caller]
    pub fn fatal(&self, code: &str, message: &str) {
        let caller = Location::caller();
        self.log(Level::Fatal, code, message, caller);

        let (notify, verbose) = {
            let config = self.config.read();
            (config.notify, config.debug)
        };

        if !notify {
            if verbose {
                debug!("Notifications disabled, skipping alert");
            }
            return;
        }
        if !self.gate.ready() {
            if verbose {
                debug!("Mail transport not ready, skipping alert");
            }
            return;
        }

        self.gate.notify(code, &caller_label(caller), message);
    }

    /// Merge a partial update onto the current configuration.
    ///
    /// Only the fields present in the update change. The sinks and the gate
    /// are reconfigured when their inputs changed.
    pub fn update(&self, update: ConfigUpdate) {
        let (old, new) = {
            let mut config = self.config.write();
            let old = config.clone();
            *config = old.clone().merged(update);
            (old, config.clone())
        };

        if let Err(e) = new.validate() {
            error!("Logger updated with invalid settings: {}", e);
        }

        if new.directory.text != old.directory.text
            || new.client != old.client
            || new.retain.text != old.retain.text
        {
            self.text_sink
                .reconfigure(&new.directory.text, &new.client, new.retain.text);
        }
        if new.directory.json != old.directory.json
            || new.client != old.client
            || new.retain.json != old.retain.json
        {
            self.json_sink
                .reconfigure(&new.directory.json, &new.client, new.retain.json);
        }
        if new.json && !self.json_sink.is_initialized() {
            self.json_sink.initialize();
        }

        if new.smtp != old.smtp
            || new.throttle_ms != old.throttle_ms
            || new.client != old.client
            || new.debug != old.debug
        {
            self.gate
                .reconfigure(new.smtp.as_ref(), new.throttle(), &new.client, new.debug);
        }
    }

    fn log(&self, level: Level, code: &str, message: &str, caller: &'static Location<'static>) {
        let (client, console, json) = {
            let config = self.config.read();
            (config.client.clone(), config.console, config.json)
        };

        if !self.text_sink.is_initialized() {
            error!("[{}] logger not initialized, dropping log call", client);
            return;
        }

        self.text_sink.verify();
        if json {
            self.json_sink.verify();
        }

        let formatter = Formatter::new(client);
        let entry = LogEntry {
            level,
            timestamp: formatter.timestamp(),
            code: code.to_string(),
            caller: caller_label(caller),
            message: message.to_string(),
        };

        let line = formatter.line(&entry);
        self.text_sink.write(&line);

        if json {
            match serde_json::to_string(&entry) {
                Ok(mut json_line) => {
                    json_line.push('\n');
                    self.json_sink.write(&json_line);
                }
                Err(e) => error!("Failed to serialize log entry: {}", e),
            }
        }

        if console {
            println!("{}", line.trim_end());
        }
    }
}

fn caller_label(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}
