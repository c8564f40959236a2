//! Platform-specific service control implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`; [`platform_service_control`] hides the choice
//! from the caller.

use std::sync::Arc;

use crate::application::restart_service::{ServiceControl, ServiceError};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod systemd;

/// Returns the service control adapter for the current platform.
///
/// # Errors
///
/// Returns [`ServiceError::Unsupported`] on platforms without an adapter.
#[allow(unreachable_code)]
pub fn platform_service_control(
    service_name: &str,
) -> Result<Arc<dyn ServiceControl>, ServiceError> {
    #[cfg(target_os = "windows")]
    {
        return Ok(Arc::new(self::windows::WindowsServiceControl::new(service_name)));
    }

    #[cfg(target_os = "linux")]
    {
        return Ok(Arc::new(self::systemd::SystemdServiceControl::new(service_name)));
    }

    let _ = service_name;
    Err(ServiceError::Unsupported)
}
