//! ConfigPatcher: applies the binding-redirect table to config files on disk.
//!
//! For each file the patcher reads the text, runs every replacement rule,
//! and only if the text changed writes a backup of the original followed by
//! the new text.  A file that is already up to date is left untouched and
//! gets no backup, so running the tool twice is harmless.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use patch_core::{
    apply_rules, next_backup_path, ReplacementRule, RuleOutcome, BINDING_REDIRECT_RULES,
};
use thiserror::Error;

/// Error type for patching a config file.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The target config file does not exist.
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Reading, backing up, or writing the file failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Receives operator-visible progress while files are patched.
#[cfg_attr(test, mockall::automock)]
pub trait PatchReporter: Send + Sync {
    /// A file is about to be processed.
    fn file_started(&self, file_name: &str);

    /// A rule was attempted against the current file.
    fn rule_applied(&self, old: &str, new: &str, outcome: RuleOutcome);

    /// The original content was copied to `backup`.
    fn backup_created(&self, backup: &Path);

    /// The file at `path` was rewritten.
    fn file_updated(&self, path: &Path);

    /// No rule changed the file at `path`.
    fn file_unchanged(&self, path: &Path);

    /// The file at `path` does not exist.
    fn file_missing(&self, path: &Path);
}

/// What happened to one config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was rewritten; the original is at `backup`.
    Updated { path: PathBuf, backup: PathBuf },
    /// The file already carried the new redirects.
    Unchanged { path: PathBuf },
}

impl FileOutcome {
    /// `true` if the file was rewritten.
    pub fn changed(&self) -> bool {
        matches!(self, FileOutcome::Updated { .. })
    }
}

/// Returns `true` if any file changed, meaning the service must be restarted.
pub fn restart_required(outcomes: &[FileOutcome]) -> bool {
    outcomes.iter().any(FileOutcome::changed)
}

/// The patch-config use case.
pub struct ConfigPatcher {
    reporter: Arc<dyn PatchReporter>,
    rules: &'static [ReplacementRule<'static>],
}

impl ConfigPatcher {
    /// Creates a patcher that applies [`BINDING_REDIRECT_RULES`].
    pub fn new(reporter: Arc<dyn PatchReporter>) -> Self {
        Self::with_rules(reporter, &BINDING_REDIRECT_RULES)
    }

    /// Creates a patcher with an explicit rule table.
    pub fn with_rules(
        reporter: Arc<dyn PatchReporter>,
        rules: &'static [ReplacementRule<'static>],
    ) -> Self {
        Self { reporter, rules }
    }

    /// Patches `folder/file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::FileNotFound`] if the file does not exist and
    /// [`PatchError::Io`] if it cannot be read, backed up, or written.  On a
    /// backup failure the original file is left as it was.
    pub fn patch_file(&self, folder: &Path, file_name: &str) -> Result<FileOutcome, PatchError> {
        self.reporter.file_started(file_name);
        let path = folder.join(file_name);

        let original = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.reporter.file_missing(&path);
                return Err(PatchError::FileNotFound(path));
            }
            Err(source) => {
                return Err(PatchError::Io {
                    action: "read",
                    path,
                    source,
                })
            }
        };

        let report = apply_rules(&original, self.rules);
        for (rule, outcome) in &report.outcomes {
            self.reporter.rule_applied(rule.old, rule.new, *outcome);
        }

        if report.text == original {
            self.reporter.file_unchanged(&path);
            return Ok(FileOutcome::Unchanged { path });
        }

        let backup = write_backup(&path, original.as_bytes())?;
        self.reporter.backup_created(&backup);

        std::fs::write(&path, report.text.as_bytes()).map_err(|source| PatchError::Io {
            action: "write",
            path: path.clone(),
            source,
        })?;
        self.reporter.file_updated(&path);

        Ok(FileOutcome::Updated { path, backup })
    }

    /// Patches every file in `file_names`, in order, under `folder`.
    ///
    /// Stops at the first error; files after it are not touched.
    ///
    /// # Errors
    ///
    /// Propagates the first [`PatchError`] returned by [`Self::patch_file`].
    pub fn patch_all(
        &self,
        folder: &Path,
        file_names: &[&str],
    ) -> Result<Vec<FileOutcome>, PatchError> {
        file_names
            .iter()
            .map(|name| self.patch_file(folder, name))
            .collect()
    }
}

/// Copies `original` to the first free backup name next to `path`.
///
/// The backup is opened with `create_new` so an existing file is never
/// overwritten, even one that appears after the name was probed.
fn write_backup(path: &Path, original: &[u8]) -> Result<PathBuf, PatchError> {
    loop {
        // symlink_metadata so a dangling link also counts as taken
        let backup = next_backup_path(path, |p| p.symlink_metadata().is_ok());
        let file = OpenOptions::new().write(true).create_new(true).open(&backup);
        match file {
            Ok(mut file) => {
                file.write_all(original)
                    .and_then(|()| file.sync_all())
                    .map_err(|source| PatchError::Io {
                        action: "write backup",
                        path: backup.clone(),
                        source,
                    })?;
                return Ok(backup);
            }
            // Lost a race for this name; probe again.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => {
                return Err(PatchError::Io {
                    action: "create backup",
                    path: backup,
                    source,
                })
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};
    use uuid::Uuid;

    use super::*;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("patch_test_{}", Uuid::new_v4()));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.0).ok();
        }
    }

    fn quiet_reporter() -> MockPatchReporter {
        let mut reporter = MockPatchReporter::new();
        reporter.expect_file_started().return_const(());
        reporter.expect_rule_applied().return_const(());
        reporter.expect_backup_created().return_const(());
        reporter.expect_file_updated().return_const(());
        reporter.expect_file_unchanged().return_const(());
        reporter.expect_file_missing().return_const(());
        reporter
    }

    fn outdated_content() -> String {
        BINDING_REDIRECT_RULES
            .iter()
            .map(|r| format!("  {}\n", r.old))
            .collect()
    }

    // ── Changed files ─────────────────────────────────────────────────────────

    #[test]
    fn test_patch_file_rewrites_outdated_file_and_creates_backup() {
        // Arrange
        let dir = TempDir::new();
        let original = outdated_content();
        std::fs::write(dir.0.join("a.config"), &original).unwrap();
        let patcher = ConfigPatcher::new(Arc::new(quiet_reporter()));

        // Act
        let outcome = patcher.patch_file(&dir.0, "a.config").unwrap();

        // Assert
        let backup = dir.0.join("a.config.bak");
        assert_eq!(
            outcome,
            FileOutcome::Updated {
                path: dir.0.join("a.config"),
                backup: backup.clone(),
            }
        );
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);
        let patched = std::fs::read_to_string(dir.0.join("a.config")).unwrap();
        for rule in &BINDING_REDIRECT_RULES {
            assert!(patched.contains(rule.new));
        }
    }

    #[test]
    fn test_patch_file_reports_each_step() {
        // Arrange
        let dir = TempDir::new();
        std::fs::write(dir.0.join("a.config"), BINDING_REDIRECT_RULES[0].old).unwrap();
        let path = dir.0.join("a.config");
        let backup = dir.0.join("a.config.bak");

        let mut reporter = MockPatchReporter::new();
        reporter
            .expect_file_started()
            .with(eq("a.config"))
            .times(1)
            .return_const(());
        reporter
            .expect_rule_applied()
            .with(
                eq(BINDING_REDIRECT_RULES[0].old),
                eq(BINDING_REDIRECT_RULES[0].new),
                eq(RuleOutcome::Replaced { occurrences: 1 }),
            )
            .times(1)
            .return_const(());
        reporter
            .expect_rule_applied()
            .with(always(), always(), eq(RuleOutcome::AlreadyUpToDate))
            .times(2)
            .return_const(());
        reporter
            .expect_backup_created()
            .with(eq(backup))
            .times(1)
            .return_const(());
        reporter
            .expect_file_updated()
            .with(eq(path))
            .times(1)
            .return_const(());
        reporter.expect_file_unchanged().never();

        let patcher = ConfigPatcher::new(Arc::new(reporter));

        // Act / Assert
        assert!(patcher.patch_file(&dir.0, "a.config").unwrap().changed());
    }

    // ── Unchanged files ───────────────────────────────────────────────────────

    #[test]
    fn test_patch_file_without_old_patterns_creates_no_backup() {
        // Arrange
        let dir = TempDir::new();
        std::fs::write(dir.0.join("a.config"), "<configuration />").unwrap();
        let mut reporter = MockPatchReporter::new();
        reporter.expect_file_started().return_const(());
        reporter.expect_rule_applied().times(3).return_const(());
        reporter.expect_file_unchanged().times(1).return_const(());
        reporter.expect_backup_created().never();
        reporter.expect_file_updated().never();
        let patcher = ConfigPatcher::new(Arc::new(reporter));

        // Act
        let outcome = patcher.patch_file(&dir.0, "a.config").unwrap();

        // Assert
        assert!(!outcome.changed());
        assert!(!dir.0.join("a.config.bak").exists());
        assert_eq!(
            std::fs::read_to_string(dir.0.join("a.config")).unwrap(),
            "<configuration />"
        );
    }

    #[test]
    fn test_patch_file_twice_creates_only_one_backup() {
        let dir = TempDir::new();
        std::fs::write(dir.0.join("a.config"), outdated_content()).unwrap();
        let patcher = ConfigPatcher::new(Arc::new(quiet_reporter()));

        let first = patcher.patch_file(&dir.0, "a.config").unwrap();
        let after_first = std::fs::read(dir.0.join("a.config")).unwrap();
        let second = patcher.patch_file(&dir.0, "a.config").unwrap();

        assert!(first.changed());
        assert!(!second.changed());
        assert_eq!(std::fs::read(dir.0.join("a.config")).unwrap(), after_first);
        assert!(!dir.0.join("a.config.bak.1").exists());
    }

    // ── Backups ───────────────────────────────────────────────────────────────

    #[test]
    fn test_existing_backup_is_kept_and_next_suffix_used() {
        let dir = TempDir::new();
        std::fs::write(dir.0.join("a.config"), outdated_content()).unwrap();
        std::fs::write(dir.0.join("a.config.bak"), "older backup").unwrap();
        let patcher = ConfigPatcher::new(Arc::new(quiet_reporter()));

        let outcome = patcher.patch_file(&dir.0, "a.config").unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Updated {
                path: dir.0.join("a.config"),
                backup: dir.0.join("a.config.bak.1"),
            }
        );
        assert_eq!(
            std::fs::read_to_string(dir.0.join("a.config.bak")).unwrap(),
            "older backup"
        );
    }

    #[test]
    fn test_write_backup_preserves_bytes_including_bom() {
        let dir = TempDir::new();
        let path = dir.0.join("bom.config");
        let bytes = "\u{feff}<configuration />\r\n".as_bytes();

        let backup = write_backup(&path, bytes).unwrap();

        assert_eq!(backup, dir.0.join("bom.config.bak"));
        assert_eq!(std::fs::read(&backup).unwrap(), bytes);
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn test_patch_file_missing_returns_file_not_found() {
        let dir = TempDir::new();
        let mut reporter = MockPatchReporter::new();
        reporter.expect_file_started().return_const(());
        reporter.expect_file_missing().times(1).return_const(());
        reporter.expect_rule_applied().never();
        let patcher = ConfigPatcher::new(Arc::new(reporter));

        let err = patcher.patch_file(&dir.0, "missing.config").unwrap_err();

        assert!(matches!(err, PatchError::FileNotFound(p) if p == dir.0.join("missing.config")));
    }

    #[test]
    fn test_patch_all_stops_at_missing_file() {
        // Arrange: first file missing, second file outdated
        let dir = TempDir::new();
        let second = outdated_content();
        std::fs::write(dir.0.join("second.config"), &second).unwrap();
        let patcher = ConfigPatcher::new(Arc::new(quiet_reporter()));

        // Act
        let result = patcher.patch_all(&dir.0, &["first.config", "second.config"]);

        // Assert: the second file was not modified
        assert!(matches!(result, Err(PatchError::FileNotFound(_))));
        assert_eq!(
            std::fs::read_to_string(dir.0.join("second.config")).unwrap(),
            second
        );
        assert!(!dir.0.join("second.config.bak").exists());
    }

    #[test]
    fn test_restart_required_only_when_a_file_was_updated() {
        let unchanged = FileOutcome::Unchanged {
            path: PathBuf::from("a"),
        };
        let updated = FileOutcome::Updated {
            path: PathBuf::from("b"),
            backup: PathBuf::from("b.bak"),
        };

        assert!(!restart_required(&[]));
        assert!(!restart_required(&[unchanged.clone(), unchanged.clone()]));
        assert!(restart_required(&[unchanged, updated]));
    }

    #[test]
    fn test_custom_rules_are_applied() {
        static RULES: [ReplacementRule<'static>; 1] = [ReplacementRule::new("old", "new")];
        let dir = TempDir::new();
        std::fs::write(dir.0.join("a.txt"), "old old").unwrap();
        let patcher = ConfigPatcher::with_rules(Arc::new(quiet_reporter()), &RULES);

        patcher.patch_file(&dir.0, "a.txt").unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.0.join("a.txt")).unwrap(),
            "new new"
        );
    }
}
