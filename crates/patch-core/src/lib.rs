//! # patch-core
//!
//! Shared library for the Qlik Sense Printing patch upgrade containing the
//! binding-redirect replacement table, the literal replacement engine, and
//! the backup file naming scheme.
//!
//! This crate has zero dependencies on OS services or on the file system.
//! Everything here is a pure function of its inputs, which keeps the rules
//! testable on any platform.
//!
//! # Overview
//!
//! - **`domain`** – The fixed replacement table ([`BINDING_REDIRECT_RULES`])
//!   and the install layout: which folder holds the printing config files,
//!   which files are patched, and which service must be restarted.
//!
//! - **`replace`** – Applies an ordered list of [`ReplacementRule`]s to a
//!   text and reports, per rule, whether anything was replaced.
//!
//! - **`backup`** – Produces the `.bak`, `.bak.1`, `.bak.2`, … candidate
//!   names and picks the first one that is not taken.

pub mod backup;
pub mod domain;
pub mod replace;

pub use backup::{backup_candidates, next_backup_path};
pub use domain::install::{printing_folder, PRINTING_SERVICE_NAME, TARGET_FILES};
pub use domain::rules::{ReplacementRule, BINDING_REDIRECT_RULES};
pub use replace::{apply_rules, ReplacementReport, RuleOutcome};
