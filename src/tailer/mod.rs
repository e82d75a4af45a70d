//! Event tailer: follows the client's append-only log file.

pub mod log_path;
#[allow(clippy::module_inception)]
pub mod tailer;

pub use log_path::{candidate_paths, default_log_path};
pub use tailer::{LogTailer, TailerConfig};
