//! Linux service control via `systemctl`.
//!
//! State queries use `systemctl show -p LoadState,ActiveState,CanStop`, whose
//! output is one `Key=value` line per property.  Stop and start requests are
//! sent with `--no-block` so that waiting stays in the use case, exactly as
//! with the Windows Service Control Manager.

#![cfg(target_os = "linux")]

use std::process::Command;

use tracing::{debug, warn};

use crate::application::restart_service::{ServiceControl, ServiceError, ServiceState};

/// Linux implementation of [`ServiceControl`] driving a systemd unit.
pub struct SystemdServiceControl {
    unit: String,
}

impl SystemdServiceControl {
    /// Creates an adapter for the unit named `unit`.
    ///
    /// A name systemd cannot accept, such as the Windows display name, is
    /// kept as is so the failure is reported by `systemctl`, but a hint is
    /// logged first.
    pub fn new(unit: &str) -> Self {
        if !is_unit_name(unit) {
            warn!(
                "{unit:?} is not a valid systemd unit name; \
                 set `service.name` in the settings file to the printing unit"
            );
        }
        Self {
            unit: unit.to_string(),
        }
    }

    /// Runs `systemctl show` for the given properties and returns its stdout.
    fn show(&self, properties: &str) -> Result<String, ServiceError> {
        let output = Command::new("systemctl")
            .args(["show", "-p", properties, "--", &self.unit])
            .output()
            .map_err(|e| ServiceError::Platform(format!("failed to run systemctl: {e}")))?;
        if !output.status.success() {
            return Err(ServiceError::Platform(format!(
                "systemctl show {} failed: {}",
                self.unit,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn request(&self, verb: &str) -> Result<(), ServiceError> {
        debug!(unit = %self.unit, verb, "systemctl request");
        let output = Command::new("systemctl")
            .args([verb, "--no-block", "--", &self.unit])
            .output()
            .map_err(|e| ServiceError::Platform(format!("failed to run systemctl: {e}")))?;
        if !output.status.success() {
            return Err(ServiceError::Platform(format!(
                "systemctl {verb} {} failed: {}",
                self.unit,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl ServiceControl for SystemdServiceControl {
    fn service_name(&self) -> &str {
        &self.unit
    }

    fn query_state(&self) -> Result<ServiceState, ServiceError> {
        let out = self.show("LoadState,ActiveState")?;
        if property(&out, "LoadState") == Some("not-found") {
            return Err(ServiceError::NotInstalled(self.unit.clone()));
        }
        Ok(active_state_to_service_state(
            property(&out, "ActiveState").unwrap_or_default(),
        ))
    }

    fn accepts_stop(&self) -> Result<bool, ServiceError> {
        let out = self.show("LoadState,CanStop")?;
        if property(&out, "LoadState") == Some("not-found") {
            return Err(ServiceError::NotInstalled(self.unit.clone()));
        }
        Ok(property(&out, "CanStop") == Some("yes"))
    }

    fn stop(&self) -> Result<(), ServiceError> {
        self.request("stop")
    }

    fn start(&self) -> Result<(), ServiceError> {
        self.request("start")
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Returns the value of `key` in `Key=value` lines.
fn property<'a>(output: &'a str, key: &str) -> Option<&'a str> {
    output.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k == key).then(|| v.trim())
    })
}

/// `true` if `name` only uses characters systemd allows in unit names.
fn is_unit_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.' | '\\' | '@'))
}

/// Maps a systemd `ActiveState` value to a [`ServiceState`].
fn active_state_to_service_state(active: &str) -> ServiceState {
    match active {
        "active" | "reloading" => ServiceState::Running,
        "inactive" | "failed" => ServiceState::Stopped,
        "activating" => ServiceState::StartPending,
        "deactivating" => ServiceState::StopPending,
        _ => ServiceState::Unknown,
    }
}
