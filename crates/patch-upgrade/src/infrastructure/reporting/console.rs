//! Operator-facing patch progress as `tracing` events.
//!
//! The messages keep the wording operators already know from earlier
//! releases of the tool, e.g. `Updating file: Printing.exe.config`.

use std::path::Path;

use patch_core::RuleOutcome;
use tracing::{error, info};

use crate::application::patch_config::PatchReporter;

/// Emits one `tracing` event per patch step.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl PatchReporter for TracingReporter {
    fn file_started(&self, file_name: &str) {
        info!("Updating file: {file_name}");
    }

    fn rule_applied(&self, old: &str, new: &str, outcome: RuleOutcome) {
        match outcome {
            RuleOutcome::Replaced { occurrences } => {
                info!("{}", replacement_heading(occurrences));
                info!("    From: {old}");
                info!("    To:   {new}");
            }
            RuleOutcome::AlreadyUpToDate => info!("  Already up to date: {new}"),
        }
    }

    fn backup_created(&self, backup: &Path) {
        info!("File backup created: {}", backup.display());
    }

    fn file_updated(&self, path: &Path) {
        info!("File updated: {}", path.display());
    }

    fn file_unchanged(&self, path: &Path) {
        info!("No file update required: {}", path.display());
    }

    fn file_missing(&self, path: &Path) {
        error!("  *** Error - File not found: {}", path.display());
    }
}

/// Heading line for a performed replacement; the count is shown only when
/// the pattern occurred more than once.
fn replacement_heading(occurrences: usize) -> String {
    if occurrences > 1 {
        format!("  Replacement performed ({occurrences} occurrences):")
    } else {
        "  Replacement performed:".to_string()
    }
}
