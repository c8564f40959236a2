//! Install root and printing folder resolution.
//!
//! Without `-f`, the install root is the platform program-files folder:
//! `%ProgramFiles%` on Windows (falling back to `C:\Program Files`), and
//! `/opt` elsewhere.  The printing folder is
//! `<root>/Qlik/Sense/Printing` and must exist.

use std::path::{Path, PathBuf};

use patch_core::printing_folder;
use thiserror::Error;

/// Error type for locating the printing folder.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// `<root>/Qlik/Sense/Printing` is not a directory.
    #[error(
        "Printing folder not found at {}. Installation folder must be provided as argument.",
        .0.display()
    )]
    PrintingFolderNotFound(PathBuf),
}

/// Returns the platform default install root.
pub fn default_install_root() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("ProgramFiles")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        PathBuf::from("/opt")
    }
}

/// Resolves and checks the printing folder.
///
/// `install_root` overrides [`default_install_root`] when given.
///
/// # Errors
///
/// Returns [`ResolveError::PrintingFolderNotFound`] if the folder is missing.
pub fn resolve_printing_folder(install_root: Option<&Path>) -> Result<PathBuf, ResolveError> {
    let root = install_root
        .map(Path::to_path_buf)
        .unwrap_or_else(default_install_root);
    let folder = printing_folder(&root);
    if folder.is_dir() {
        Ok(folder)
    } else {
        Err(ResolveError::PrintingFolderNotFound(folder))
    }
}
