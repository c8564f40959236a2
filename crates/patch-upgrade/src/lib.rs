//! patch-upgrade library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the tool do?
//!
//! After a Qlik Sense upgrade the printing service can fail to load its
//! assemblies because its config files still redirect to the old versions.
//! The tool:
//!
//! 1. Locates `<install root>/Qlik/Sense/Printing`.
//! 2. Rewrites the outdated `<bindingRedirect>` elements in
//!    `Printing.exe.config` and `Qlik.Sense.Printing.dll.config`, keeping a
//!    `.bak` copy of each file it changes.
//! 3. If anything changed, stops the printing service and starts it again,
//!    waiting a bounded time for it to come back up.

/// Application layer: the patch and restart use cases.
pub mod application;

/// Infrastructure layer: OS service adapters, settings, and reporting.
pub mod infrastructure;
