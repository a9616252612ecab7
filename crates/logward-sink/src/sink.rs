//! Rotating daily file sink
//!
//! A `FileSink` owns the file handle for "today's" log file inside its
//! directory. Every write path first verifies the calendar day; on a day
//! change it re-opens the destination and prunes old files in a detached
//! background task, so rotation happens no later than the first log call of
//! a new day without a timer thread.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use logward_core::{Formatter, Result, JSON_EXT, TEXT_EXT};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::prune;

/// On-disk format of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Plain-text lines with a separator banner per rotation
    Text,
    /// JSON lines; no banner, the stream stays parseable
    Json,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Text => TEXT_EXT,
            FileFormat::Json => JSON_EXT,
        }
    }

    fn has_banner(&self) -> bool {
        matches!(self, FileFormat::Text)
    }
}

/// Sink settings and lifecycle state, held together under one lock so every
/// operation sees a coherent snapshot.
struct SinkState {
    dir: PathBuf,
    client: String,
    retain: usize,
    file: Option<std::fs::File>,
    path: PathBuf,
    day: u32,
    initialized: bool,
}

/// Rotating daily file sink for one format
pub struct FileSink {
    format: FileFormat,
    state: Mutex<SinkState>,
}

impl FileSink {
    /// Create an uninitialized sink; call [`FileSink::initialize`] before use
    pub fn new(
        dir: impl Into<PathBuf>,
        client: impl Into<String>,
        retain: usize,
        format: FileFormat,
    ) -> Self {
        Self {
            format,
            state: Mutex::new(SinkState {
                dir: dir.into(),
                client: client.into(),
                retain,
                file: None,
                path: PathBuf::new(),
                day: 0,
                initialized: false,
            }),
        }
    }

    /// Open today's file, creating the directory if needed. Idempotent.
    ///
    /// On failure the sink stays uninitialized and subsequent writes are
    /// dropped; the host process keeps running.
    pub fn initialize(&self) {
        let mut state = self.state.lock();
        if state.initialized {
            return;
        }

        let now = Local::now();
        state.day = now.day();

        match open_current(&mut state, self.format, now.date_naive()) {
            Ok(()) => state.initialized = true,
            Err(e) => error!(
                "Failed to initialize log sink in {}: {}",
                state.dir.display(),
                e
            ),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// Append one rendered line to the current file.
    ///
    /// Dropped with a warning if the sink is uninitialized; a write failure
    /// loses the line but leaves the sink initialized for the next call.
    pub fn write(&self, line: &str) {
        let mut state = self.state.lock();
        if !state.initialized {
            warn!("[{}] log sink not initialized, dropping line", state.client);
            return;
        }

        let path = state.path.clone();
        match state.file.as_mut() {
            Some(file) => {
                if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
                    error!("Failed to write to log file {}: {}", path.display(), e);
                }
            }
            None => warn!("[{}] log sink has no open file, dropping line", state.client),
        }
    }

    /// Check for a day rollover; rotate and schedule pruning when one
    /// happened. Cheap when the day is unchanged.
    pub fn verify(&self) {
        self.verify_at(Local::now());
    }

    /// Replace directory, client, and retention settings.
    ///
    /// If the resolved current path changes while the sink is initialized,
    /// the open+banner sequence runs against the new destination.
    pub fn reconfigure(&self, dir: impl Into<PathBuf>, client: impl Into<String>, retain: usize) {
        let mut state = self.state.lock();
        state.dir = dir.into();
        state.client = client.into();
        state.retain = retain;

        if !state.initialized {
            return;
        }

        let date = Local::now().date_naive();
        let formatter = Formatter::new(state.client.clone());
        let path = state.dir.join(formatter.filename(date, self.format.extension()));
        if path != state.path {
            if let Err(e) = open_current(&mut state, self.format, date) {
                error!(
                    "Failed to move log sink to {}: {}",
                    state.dir.display(),
                    e
                );
                state.initialized = false;
            }
        }
    }

    /// Day-rollover check against an explicit clock reading.
    ///
    /// Returns the pruning task handle when rotation dispatched one onto the
    /// async runtime.
    fn verify_at(&self, now: DateTime<Local>) -> Option<tokio::task::JoinHandle<()>> {
        let mut state = self.state.lock();
        if state.day == now.day() {
            return None;
        }

        match open_current(&mut state, self.format, now.date_naive()) {
            Ok(()) => {
                state.day = now.day();
                state.initialized = true;

                let dir = state.dir.clone();
                let retain = state.retain;
                drop(state);

                debug!("Rotated log file, pruning {} in background", dir.display());
                spawn_prune(dir, retain, self.format.extension())
            }
            Err(e) => {
                error!("Failed to rotate log file: {}", e);
                None
            }
        }
    }
}

/// Create the directory and open (append) today's file, writing the
/// separator banner for formats that carry one.
fn open_current(state: &mut SinkState, format: FileFormat, date: NaiveDate) -> Result<()> {
    std::fs::create_dir_all(&state.dir)?;

    let formatter = Formatter::new(state.client.clone());
    let path = state.dir.join(formatter.filename(date, format.extension()));

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if format.has_banner() {
        file.write_all(formatter.separator(date).as_bytes())?;
        file.flush()?;
    }

    state.file = Some(file);
    state.path = path;
    Ok(())
}

/// Dispatch pruning off the log-emission path.
///
/// Inside a tokio runtime this lands on the blocking pool; without one it
/// runs on a plain detached thread. Either way the triggering call never
/// waits for it.
fn spawn_prune(dir: PathBuf, retain: usize, ext: &'static str) -> Option<tokio::task::JoinHandle<()>> {
    let prune_pass = move || {
        if let Err(e) = prune::prune_directory(&dir, retain, ext) {
            error!("Log pruning failed in {}: {}", dir.display(), e);
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Some(handle.spawn_blocking(prune_pass)),
        Err(_) => {
            std::thread::spawn(prune_pass);
            None
        }
    }
}
