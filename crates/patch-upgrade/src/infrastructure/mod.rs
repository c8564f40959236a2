//! Infrastructure layer for the patch tool.
//!
//! Contains OS-facing adapters and everything that reads the environment.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `patch_core`, but MUST NOT be imported by the `application` layer outside
//! of tests.
//!
//! # Sub-modules
//!
//! - **`install_root`** – Resolves the install root (`-f` override or the
//!   platform program-files folder) and checks the printing folder exists.
//!
//! - **`reporting`** – [`PatchReporter`](crate::application::patch_config::PatchReporter)
//!   implementations: one that emits `tracing` events for the operator and a
//!   recording one for tests.
//!
//! - **`service_control`** – OS-specific implementations of
//!   [`ServiceControl`](crate::application::restart_service::ServiceControl).
//!   The correct implementation is selected at compile time using
//!   `#[cfg(target_os)]`.  A `MockServiceControl` is also provided for tests.
//!
//! - **`storage`** – TOML settings file with service name and timeouts.

pub mod install_root;
pub mod reporting;
pub mod service_control;
pub mod storage;
