//! Recording reporter for integration tests.
//!
//! Unit tests inside the crate use the `mockall`-generated
//! `MockPatchReporter`; that type only exists under `cfg(test)`, so tests in
//! `tests/` use this hand-written recorder instead and assert on `events`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use patch_core::RuleOutcome;

use crate::application::patch_config::PatchReporter;

/// One reported step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    FileStarted(String),
    RuleApplied {
        old: String,
        new: String,
        outcome: RuleOutcome,
    },
    BackupCreated(PathBuf),
    FileUpdated(PathBuf),
    FileUnchanged(PathBuf),
    FileMissing(PathBuf),
}

/// Records every reported step in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    /// Creates a reporter with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl PatchReporter for RecordingReporter {
    fn file_started(&self, file_name: &str) {
        self.push(ReportEvent::FileStarted(file_name.to_string()));
    }

    fn rule_applied(&self, old: &str, new: &str, outcome: RuleOutcome) {
        self.push(ReportEvent::RuleApplied {
            old: old.to_string(),
            new: new.to_string(),
            outcome,
        });
    }

    fn backup_created(&self, backup: &Path) {
        self.push(ReportEvent::BackupCreated(backup.to_path_buf()));
    }

    fn file_updated(&self, path: &Path) {
        self.push(ReportEvent::FileUpdated(path.to_path_buf()));
    }

    fn file_unchanged(&self, path: &Path) {
        self.push(ReportEvent::FileUnchanged(path.to_path_buf()));
    }

    fn file_missing(&self, path: &Path) {
        self.push(ReportEvent::FileMissing(path.to_path_buf()));
    }
}
