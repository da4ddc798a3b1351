use std::path::{Path, PathBuf};

/// Name of the error log written next to the executable when a run fails.
pub const ERROR_LOG_FILE: &str = "LastError.txt";

/// `LastError.txt` in the directory of the running executable.
pub fn default_error_log_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(ERROR_LOG_FILE))
}

/// Write the diagnostic record of a failed run, replacing any previous one.
pub fn write_error_log(path: &Path, message: &str, args: &[String]) -> Result<(), String> {
    let record = format!(
        "{}\n\nArguments: {}\nVersion: {}\n",
        message,
        args.join(" "),
        env!("CARGO_PKG_VERSION")
    );
    std::fs::write(path, record)
        .map_err(|e| format!("Failed to write error log '{}': {}", path.display(), e))
}
