//! Constants and default values for Logward

use std::path::PathBuf;

/// Default client name used when none is configured
pub const DEFAULT_CLIENT: &str = "logward";

/// Default log directory name under the client home
pub const LOGS_DIR: &str = "logs";

/// Default structured log directory name under the log directory
pub const JSON_LOGS_DIR: &str = "json";

/// File extension for plain-text log files
pub const TEXT_EXT: &str = "txt";

/// File extension for structured log files
pub const JSON_EXT: &str = "json";

/// Default number of daily files to keep per format
pub const DEFAULT_RETAIN_FILES: usize = 14;

/// Default minimum interval between sent notifications in milliseconds
pub const DEFAULT_THROTTLE_MS: u64 = 60_000;

/// Get the home directory for a client (e.g. `~/.myapp`)
pub fn client_home(client: &str) -> PathBuf {
    let name = format!(".{}", client.to_lowercase());
    dirs::home_dir()
        .map(|h| h.join(&name))
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Get the default plain-text log directory for a client
pub fn text_logs_dir(client: &str) -> PathBuf {
    client_home(client).join(LOGS_DIR)
}

/// Get the default structured log directory for a client
pub fn json_logs_dir(client: &str) -> PathBuf {
    client_home(client).join(LOGS_DIR).join(JSON_LOGS_DIR)
}
