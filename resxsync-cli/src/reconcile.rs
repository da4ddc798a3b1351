use std::path::{Path, PathBuf};

use resxsync::{ReconcileOptions, ReconcileReport, reconcile};
use serde_json::json;
use tracing::info;

use crate::discovery::find_resource_files;

#[derive(Debug, Clone)]
pub struct ReconcileCommand {
    pub dir: PathBuf,
    pub dry_run: bool,
    pub report_json: Option<PathBuf>,
}

/// Validate that the folder exists and is a directory
pub fn validate_dir(dir: &Path) -> Result<(), String> {
    if !dir.exists() {
        return Err(format!("Folder not found: {}", dir.display()));
    }
    if !dir.is_dir() {
        return Err(format!("Path is not a folder: {}", dir.display()));
    }
    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Cannot create output directory: {}", e))?;
        }
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_report(
    path: &Path,
    opts: &ReconcileCommand,
    report: &ReconcileReport,
) -> Result<(), String> {
    let payload = json!({
        "folder": opts.dir,
        "default_file": report.default_file,
        "dry_run": report.dry_run,
        "summary": {
            "files": report.files.len(),
            "changed": report.changed().count(),
            "added": report.total_added()
        },
        "files": report.files
    });

    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(path, text)
        .map_err(|e| format!("Failed to write report JSON '{}': {}", path.display(), e))
}

fn print_summary(report: &ReconcileReport) {
    for file in report.changed() {
        println!(
            "{} {}: +{} ({})",
            if file.written { "Updated" } else { "Would update" },
            file_label(&file.path),
            file.added.len(),
            file.added.join(", ")
        );
    }

    if report.is_clean() {
        println!(
            "✅ All {} files already in sync (default: {})",
            report.files.len(),
            file_label(&report.default_file)
        );
    } else {
        println!(
            "✅ Reconciled {} files: {} entries added to {} files",
            report.files.len(),
            report.total_added(),
            report.changed().count()
        );
    }
}

pub fn run_reconcile_command(opts: &ReconcileCommand) -> Result<ReconcileReport, String> {
    validate_dir(&opts.dir)?;
    if let Some(report_path) = &opts.report_json {
        validate_output_path(report_path)?;
    }

    let files = find_resource_files(&opts.dir)?;
    if files.is_empty() {
        return Err(format!("No .resx files in folder: {}", opts.dir.display()));
    }
    info!(folder = %opts.dir.display(), files = files.len(), "found resource files");

    let report = reconcile(&files, ReconcileOptions::new().with_dry_run(opts.dry_run))
        .map_err(|e| format!("Failed to reconcile '{}': {}", opts.dir.display(), e))?;

    print_summary(&report);

    if let Some(report_path) = &opts.report_json {
        write_report(report_path, opts, &report)?;
        println!("Report JSON written: {}", report_path.display());
    }

    if opts.dry_run {
        println!("Dry-run mode: no files were written");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_dir() {
        let dir = TempDir::new().unwrap();
        assert!(validate_dir(dir.path()).is_ok());

        let missing = dir.path().join("missing");
        assert!(validate_dir(&missing).unwrap_err().contains("Folder not found"));

        let file = dir.path().join("Strings.resx");
        fs::write(&file, "<root/>").unwrap();
        assert!(validate_dir(&file).unwrap_err().contains("not a folder"));
    }

    #[test]
    fn test_validate_output_path_creates_parent() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("out").join("report.json");
        validate_output_path(&report).unwrap();
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_run_reports_missing_resx_files() {
        let dir = TempDir::new().unwrap();
        let opts = ReconcileCommand {
            dir: dir.path().to_path_buf(),
            dry_run: false,
            report_json: None,
        };
        let err = run_reconcile_command(&opts).unwrap_err();
        assert!(err.starts_with("No .resx files in folder"));
    }

    #[test]
    fn test_run_writes_report() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Strings.resx"),
            "<root>\n  <data name=\"A\"><value>a</value></data>\n</root>\n",
        )
        .unwrap();
        fs::write(dir.path().join("Strings.fr.resx"), "<root>\n</root>\n").unwrap();
        let report_path = dir.path().join("report.json");

        let opts = ReconcileCommand {
            dir: dir.path().to_path_buf(),
            dry_run: false,
            report_json: Some(report_path.clone()),
        };
        let report = run_reconcile_command(&opts).unwrap();
        assert_eq!(report.total_added(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(json["summary"]["added"], 1);
        assert_eq!(json["summary"]["changed"], 1);
        let files = json["files"].as_array().unwrap();
        let french = files
            .iter()
            .find(|f| f["is_default"] == false)
            .expect("localized file in report");
        assert_eq!(french["locale_tag"], "F_");
        assert_eq!(french["added"][0], "A");
        assert_eq!(french["written"], true);
        let default = files.iter().find(|f| f["is_default"] == true).unwrap();
        assert_eq!(default["added"].as_array().unwrap().len(), 0);
        assert_eq!(default["written"], false);
    }
}
