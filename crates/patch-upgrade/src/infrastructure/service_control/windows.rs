//! Windows service control via the Service Control Manager.
//!
//! Opens the SCM and the named service for every request, asks for only the
//! access right that request needs, and closes both handles on drop.

#![cfg(target_os = "windows")]

use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::{ERROR_ACCESS_DENIED, ERROR_SERVICE_DOES_NOT_EXIST};
use windows::Win32::System::Services::{
    CloseServiceHandle, ControlService, OpenSCManagerW, OpenServiceW, QueryServiceStatus,
    StartServiceW, SC_HANDLE, SC_MANAGER_CONNECT, SERVICE_ACCEPT_STOP, SERVICE_CONTINUE_PENDING,
    SERVICE_CONTROL_STOP, SERVICE_PAUSED, SERVICE_PAUSE_PENDING, SERVICE_QUERY_STATUS,
    SERVICE_RUNNING, SERVICE_START, SERVICE_START_PENDING, SERVICE_STATUS,
    SERVICE_STATUS_CURRENT_STATE, SERVICE_STOP, SERVICE_STOPPED, SERVICE_STOP_PENDING,
};

use crate::application::restart_service::{ServiceControl, ServiceError, ServiceState};

/// Windows implementation of [`ServiceControl`] using the SCM API.
pub struct WindowsServiceControl {
    name: String,
}

impl WindowsServiceControl {
    /// Creates an adapter for the service named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn open(&self, access: u32) -> Result<OpenService, ServiceError> {
        // SAFETY: null machine and database names select the local SCM.
        let manager = unsafe { OpenSCManagerW(PCWSTR::null(), PCWSTR::null(), SC_MANAGER_CONNECT) }
            .map_err(|e| self.map_error("open service manager", e))?;
        let manager = ScHandle(manager);

        let name = HSTRING::from(self.name.as_str());
        // SAFETY: manager is a valid SCM handle and name outlives the call.
        let service = unsafe { OpenServiceW(manager.0, &name, access) }
            .map_err(|e| self.map_error("open service", e))?;

        Ok(OpenService {
            service: ScHandle(service),
            _manager: manager,
        })
    }

    fn query_status(&self) -> Result<SERVICE_STATUS, ServiceError> {
        let handles = self.open(SERVICE_QUERY_STATUS)?;
        let mut status = SERVICE_STATUS::default();
        // SAFETY: status is a valid, writable SERVICE_STATUS on the stack.
        unsafe { QueryServiceStatus(handles.service.0, &mut status) }
            .map_err(|e| self.map_error("query service status", e))?;
        Ok(status)
    }

    fn map_error(&self, action: &str, e: windows::core::Error) -> ServiceError {
        if e.code() == ERROR_SERVICE_DOES_NOT_EXIST.to_hresult() {
            ServiceError::NotInstalled(self.name.clone())
        } else if e.code() == ERROR_ACCESS_DENIED.to_hresult() {
            ServiceError::Platform(format!(
                "{action} for {:?}: access denied (run as administrator)",
                self.name
            ))
        } else {
            ServiceError::Platform(format!("{action} for {:?}: {e}", self.name))
        }
    }
}

impl ServiceControl for WindowsServiceControl {
    fn service_name(&self) -> &str {
        &self.name
    }

    fn query_state(&self) -> Result<ServiceState, ServiceError> {
        Ok(current_state_to_service_state(self.query_status()?.dwCurrentState))
    }

    fn accepts_stop(&self) -> Result<bool, ServiceError> {
        Ok(self.query_status()?.dwControlsAccepted & SERVICE_ACCEPT_STOP != 0)
    }

    fn stop(&self) -> Result<(), ServiceError> {
        let handles = self.open(SERVICE_STOP)?;
        let mut status = SERVICE_STATUS::default();
        // SAFETY: the handle was opened with SERVICE_STOP access.
        unsafe { ControlService(handles.service.0, SERVICE_CONTROL_STOP, &mut status) }
            .map_err(|e| self.map_error("stop service", e))
    }

    fn start(&self) -> Result<(), ServiceError> {
        let handles = self.open(SERVICE_START)?;
        // SAFETY: the handle was opened with SERVICE_START access.
        unsafe { StartServiceW(handles.service.0, None) }
            .map_err(|e| self.map_error("start service", e))
    }
}

// ── Handles ───────────────────────────────────────────────────────────────────

/// Owned SCM handle, closed on drop.
struct ScHandle(SC_HANDLE);

impl Drop for ScHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from OpenSCManagerW/OpenServiceW and is
        // closed exactly once.
        unsafe {
            let _ = CloseServiceHandle(self.0);
        }
    }
}

/// A service handle together with the manager it was opened from.
///
/// Field order matters: the service handle is dropped before the manager.
struct OpenService {
    service: ScHandle,
    _manager: ScHandle,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn current_state_to_service_state(state: SERVICE_STATUS_CURRENT_STATE) -> ServiceState {
    match state {
        SERVICE_STOPPED => ServiceState::Stopped,
        SERVICE_START_PENDING => ServiceState::StartPending,
        SERVICE_STOP_PENDING => ServiceState::StopPending,
        SERVICE_RUNNING => ServiceState::Running,
        SERVICE_CONTINUE_PENDING => ServiceState::ContinuePending,
        SERVICE_PAUSE_PENDING => ServiceState::PausePending,
        SERVICE_PAUSED => ServiceState::Paused,
        _ => ServiceState::Unknown,
    }
}
