//! Install layout of the Qlik Sense Printing component.

use std::path::{Path, PathBuf};

/// Name of the OS service that loads the patched config files.
pub const PRINTING_SERVICE_NAME: &str = "Qlik Sense Printing Service";

/// Config files patched, in the order they are processed.
pub const TARGET_FILES: [&str; 2] = ["Printing.exe.config", "Qlik.Sense.Printing.dll.config"];

/// Path segments from the install root to the printing folder.
const PRINTING_SUBDIR: [&str; 3] = ["Qlik", "Sense", "Printing"];

/// Returns `<install_root>/Qlik/Sense/Printing` using the platform separator.
pub fn printing_folder(install_root: &Path) -> PathBuf {
    PRINTING_SUBDIR
        .iter()
        .fold(install_root.to_path_buf(), |acc, part| acc.join(part))
}
