//! Application layer use cases.
//!
//! - **`patch_config`** – Applies the binding-redirect table to each target
//!   config file, writing a backup before any change.  Progress is reported
//!   through an injected [`patch_config::PatchReporter`].
//!
//! - **`restart_service`** – Stops and restarts the printing service through
//!   an injected [`restart_service::ServiceControl`] and polls until the
//!   service reaches the wanted state or the timeout elapses.

pub mod patch_config;
pub mod restart_service;
