//! CLI library for testing purposes

pub mod discovery;
pub mod error_log;
pub mod logging;
pub mod reconcile;

pub use discovery::find_resource_files;
pub use error_log::{default_error_log_path, write_error_log};
pub use reconcile::{ReconcileCommand, run_reconcile_command};
