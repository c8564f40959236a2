//! TOML-based settings for the patch tool.
//!
//! Settings are optional.  When no file exists every value falls back to
//! its default, which matches the behaviour operators expect:
//!
//! ```toml
//! [service]
//! name = "Qlik Sense Printing Service"
//! start_timeout_secs = 10
//! # stop_timeout_secs = 30   # absent = wait until stopped
//! poll_interval_ms = 250
//!
//! [logging]
//! log_level = "info"
//! ```
//!
//! The file is read from `--config <file>` or from the platform config
//! directory:
//! - Windows:  `%APPDATA%\QlikPrintingPatch\config.toml`
//! - Linux:    `~/.config/qlikprintingpatch/config.toml`
//! - macOS:    `~/Library/Application Support/QlikPrintingPatch/config.toml`
//!
//! The replacement table is compiled in and cannot be changed here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use patch_core::PRINTING_SERVICE_NAME;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::restart_service::RestartPolicy;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which service to restart and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSettings {
    /// Service name (Windows) or systemd unit name (Linux).
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Seconds to wait for the service to report running after start.
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
    /// Seconds to wait for the service to stop; absent waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_timeout_secs: Option<u64>,
    /// Milliseconds between two state queries.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_service_name() -> String {
    PRINTING_SERVICE_NAME.to_string()
}
fn default_start_timeout_secs() -> u64 {
    10
}
fn default_poll_interval_ms() -> u64 {
    250
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            start_timeout_secs: default_start_timeout_secs(),
            stop_timeout_secs: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ServiceSettings {
    /// Converts the stored timings into a [`RestartPolicy`].
    pub fn restart_policy(&self) -> RestartPolicy {
        RestartPolicy {
            start_timeout: Duration::from_secs(self.start_timeout_secs),
            stop_timeout: self.stop_timeout_secs.map(Duration::from_secs),
            // A zero interval would spin on the service manager.
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Resolves the default settings file path, if the platform has a config dir.
pub fn settings_file_path() -> Option<PathBuf> {
    platform_config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads settings from `explicit`, or from [`settings_file_path`] when
/// `explicit` is `None`.
///
/// A missing default file yields [`Settings::default`]; a missing explicit
/// file is an error because the operator asked for it.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors and
/// [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    match explicit {
        Some(path) => read_settings(path),
        None => match settings_file_path() {
            Some(path) => match read_settings(&path) {
                Err(SettingsError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    Ok(Settings::default())
                }
                other => other,
            },
            None => Ok(Settings::default()),
        },
    }
}

/// Reads and parses the settings file at `path`.
///
/// # Errors
///
/// See [`load_settings`].
pub fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory for this tool.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("QlikPrintingPatch"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("qlikprintingpatch"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("QlikPrintingPatch")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
