//! Configuration for Logward
//!
//! `Config` is a plain value handed to the logger at construction; there is
//! no process-wide default. Partial runtime updates use `ConfigUpdate`, where
//! every field is presence-tracked so an explicit `false` or `0` is distinct
//! from "not provided".
//!
//! Configuration files may be TOML (.toml), YAML (.yaml, .yml), or JSON
//! (.json), detected from the extension.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::error::{Error, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Per-format target directories for log files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directories {
    /// Directory for plain-text daily files
    pub text: PathBuf,
    /// Directory for structured (JSON lines) daily files
    pub json: PathBuf,
}

/// Per-format retention counts (number of daily files to keep, each >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retention {
    pub text: usize,
    pub json: usize,
}

/// SMTP transport settings for the notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address; the client name becomes the display name
    pub from: String,
    /// One or more recipient addresses
    pub to: Vec<String>,
    /// Implicit TLS; when absent, inferred from port 465
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

impl SmtpSettings {
    /// Whether to use implicit TLS (as opposed to STARTTLS)
    pub fn effective_secure(&self) -> bool {
        self.secure.unwrap_or(self.port == 465)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::config("smtp host must not be empty"));
        }
        if self.from.is_empty() {
            return Err(Error::config("smtp from address must not be empty"));
        }
        if self.to.is_empty() {
            return Err(Error::config("smtp requires at least one recipient"));
        }
        Ok(())
    }
}

/// Full logger configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Client name, used in filenames, banners, and email subjects
    pub client: String,
    /// Write a structured (JSON lines) copy of every entry
    pub json: bool,
    /// Gate verbose diagnostic output
    pub debug: bool,
    /// Echo every rendered line to the console
    pub console: bool,
    pub directory: Directories,
    pub retain: Retention,
    /// Master switch for fatal-event notifications
    pub notify: bool,
    /// Minimum interval between sent notifications, in milliseconds
    pub throttle_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<SmtpSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_CLIENT)
    }
}

impl Config {
    /// Build a configuration with directories derived from the client name
    pub fn new(client: impl Into<String>) -> Self {
        let client = client.into();
        let directory = Directories {
            text: text_logs_dir(&client),
            json: json_logs_dir(&client),
        };
        Self {
            client,
            json: false,
            debug: false,
            console: false,
            directory,
            retain: Retention {
                text: DEFAULT_RETAIN_FILES,
                json: DEFAULT_RETAIN_FILES,
            },
            notify: true,
            throttle_ms: DEFAULT_THROTTLE_MS,
            smtp: None,
        }
    }

    /// Load a configuration from a file, automatically detecting the format.
    ///
    /// Fields absent from the file keep their derived defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let update = ConfigUpdate::load_from(path)?;
        let base = match update.client.as_deref() {
            Some(client) => Config::new(client.to_string()),
            None => Config::default(),
        };
        Ok(base.merged(update))
    }

    /// Save as pretty TOML with owner-only permissions.
    ///
    /// The file may contain SMTP credentials.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, &content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
                tracing::warn!("Failed to set config file permissions: {}", e);
            }
        }

        Ok(())
    }

    /// Merge a partial update onto this configuration.
    ///
    /// Only fields present in the update change; the rest keep their prior
    /// values. Providing `smtp` replaces the whole settings block.
    pub fn merged(mut self, update: ConfigUpdate) -> Self {
        if let Some(client) = update.client {
            self.client = client;
        }
        if let Some(json) = update.json {
            self.json = json;
        }
        if let Some(debug) = update.debug {
            self.debug = debug;
        }
        if let Some(console) = update.console {
            self.console = console;
        }
        if let Some(directory) = update.directory {
            self.directory = directory;
        }
        if let Some(retain) = update.retain {
            self.retain = retain;
        }
        if let Some(notify) = update.notify {
            self.notify = notify;
        }
        if let Some(throttle_ms) = update.throttle_ms {
            self.throttle_ms = throttle_ms;
        }
        if let Some(smtp) = update.smtp {
            self.smtp = Some(smtp);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.client.is_empty() {
            return Err(Error::config("client name must not be empty"));
        }
        if self.retain.text == 0 || self.retain.json == 0 {
            return Err(Error::config("retention count must be at least 1"));
        }
        if let Some(smtp) = &self.smtp {
            smtp.validate()?;
        }
        Ok(())
    }

    /// Throttle interval as a `Duration`
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

/// Partial configuration: every field optional and presence-tracked
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigUpdate {
    pub client: Option<String>,
    pub json: Option<bool>,
    pub debug: Option<bool>,
    pub console: Option<bool>,
    pub directory: Option<Directories>,
    pub retain: Option<Retention>,
    pub notify: Option<bool>,
    pub throttle_ms: Option<u64>,
    pub smtp: Option<SmtpSettings>,
}

impl ConfigUpdate {
    /// Load a partial configuration from a file, detecting the format
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::config(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config content with a specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let update = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_format_detection() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("yaml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_new_derives_directories_from_client() {
        let config = Config::new("myapp");
        assert_eq!(config.client, "myapp");
        assert!(config.directory.text.to_string_lossy().contains(".myapp"));
        assert!(config.directory.json.ends_with("json"));
        assert_eq!(config.retain.text, DEFAULT_RETAIN_FILES);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_merge_applies_present_fields_only() {
        let config = Config::new("myapp");
        let merged = config.clone().merged(ConfigUpdate {
            console: Some(true),
            throttle_ms: Some(5_000),
            ..Default::default()
        });

        assert!(merged.console);
        assert_eq!(merged.throttle_ms, 5_000);
        // Absent fields keep prior values
        assert_eq!(merged.client, config.client);
        assert_eq!(merged.directory, config.directory);
        assert_eq!(merged.retain, config.retain);
    }

    #[test]
    fn test_merge_applies_explicit_false_and_zero() {
        let mut config = Config::new("myapp");
        config.console = true;
        config.notify = true;
        config.throttle_ms = 60_000;

        let merged = config.merged(ConfigUpdate {
            console: Some(false),
            notify: Some(false),
            throttle_ms: Some(0),
            ..Default::default()
        });

        assert!(!merged.console);
        assert!(!merged.notify);
        assert_eq!(merged.throttle_ms, 0);
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
client = "myapp"
console = true
throttle_ms = 2000

[smtp]
host = "smtp.example.com"
port = 587
username = "mailer"
password = "hunter2"
from = "alerts@example.com"
to = ["ops@example.com", "dev@example.com"]
"#;
        let update = ConfigUpdate::parse(content, ConfigFormat::Toml).unwrap();
        assert_eq!(update.client.as_deref(), Some("myapp"));
        assert_eq!(update.console, Some(true));
        assert_eq!(update.throttle_ms, Some(2000));
        let smtp = update.smtp.unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.to.len(), 2);
        assert_eq!(smtp.secure, None);
    }

    #[test]
    fn test_parse_yaml() {
        let content = r#"
client: myapp
json: true
retain:
  text: 7
  json: 3
"#;
        let update = ConfigUpdate::parse(content, ConfigFormat::Yaml).unwrap();
        assert_eq!(update.client.as_deref(), Some("myapp"));
        assert_eq!(update.json, Some(true));
        let retain = update.retain.unwrap();
        assert_eq!(retain.text, 7);
        assert_eq!(retain.json, 3);
    }

    #[test]
    fn test_parse_json() {
        let content = r#"{ "client": "myapp", "debug": true }"#;
        let update = ConfigUpdate::parse(content, ConfigFormat::Json).unwrap();
        assert_eq!(update.client.as_deref(), Some("myapp"));
        assert_eq!(update.debug, Some(true));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = Config::load_from(Path::new("/nonexistent/logward.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_derives_directories_from_file_client() {
        let content = "client = \"acme\"\n";
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.client, "acme");
        assert!(config.directory.text.to_string_lossy().contains(".acme"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut config = Config::new("myapp");
        config.console = true;
        config.retain = Retention { text: 5, json: 2 };
        config.smtp = Some(SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 465,
            username: "mailer".to_string(),
            password: "hunter2".to_string(),
            from: "alerts@example.com".to_string(),
            to: vec!["ops@example.com".to_string()],
            secure: None,
        });

        let file = NamedTempFile::with_suffix(".toml").unwrap();
        config.save_to(file.path()).unwrap();

        let loaded = Config::load_from(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_rejects_zero_retention() {
        let mut config = Config::new("myapp");
        config.retain.text = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_recipients() {
        let mut config = Config::new("myapp");
        config.smtp = Some(SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "alerts@example.com".to_string(),
            to: vec![],
            secure: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secure_inferred_from_port() {
        let mut smtp = SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 465,
            username: String::new(),
            password: String::new(),
            from: "alerts@example.com".to_string(),
            to: vec!["ops@example.com".to_string()],
            secure: None,
        };
        assert!(smtp.effective_secure());

        smtp.port = 587;
        assert!(!smtp.effective_secure());

        smtp.secure = Some(true);
        assert!(smtp.effective_secure());
    }
}
