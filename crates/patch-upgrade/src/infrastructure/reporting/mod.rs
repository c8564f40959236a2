//! [`PatchReporter`](crate::application::patch_config::PatchReporter)
//! implementations.

pub mod console;
pub mod mock;

pub use console::TracingReporter;
pub use mock::{RecordingReporter, ReportEvent};
