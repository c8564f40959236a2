//! Backup file naming.
//!
//! Given `file`, the candidates are `file.bak`, `file.bak.1`, `file.bak.2`,
//! … without an upper bound.  [`next_backup_path`] returns the first
//! candidate the supplied predicate reports as free.  The predicate is
//! injected so the scheme can be tested without a file system; callers that
//! work on disk pass `|p| p.exists()`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Iterator over backup name candidates for `file`, in probe order.
pub fn backup_candidates(file: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    let base = with_suffix(file, ".bak");
    let numbered = (1u64..).map(move |n| with_suffix(file, &format!(".bak.{n}")));
    std::iter::once(base).chain(numbered)
}

/// Returns the first backup name for `file` for which `exists` is `false`.
pub fn next_backup_path(file: &Path, mut exists: impl FnMut(&Path) -> bool) -> PathBuf {
    backup_candidates(file)
        .find(|candidate| !exists(candidate))
        .unwrap_or_else(|| with_suffix(file, ".bak"))
}

/// Appends `suffix` to the full file name (not replacing the extension).
fn with_suffix(file: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(file.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
