use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn resxsync_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("resxsync"));
    cmd.env_remove("RESXSYNC_LOG");
    cmd.env_remove("RESXSYNC_ERROR_LOG");
    cmd
}

fn resx(entries: &[(&str, &str)]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root>\n");
    for (name, value) in entries {
        out.push_str(&format!(
            "  <data name=\"{}\" xml:space=\"preserve\">\n    <value>{}</value>\n  </data>\n",
            name, value
        ));
    }
    out.push_str("</root>\n");
    out
}

#[test]
fn test_reconciles_folder() {
    let temp_dir = TempDir::new().unwrap();
    let default = temp_dir.path().join("strings.resx");
    let french = temp_dir.path().join("strings.fr.resx");
    fs::write(&default, resx(&[("A", "Apple"), ("B", "Banana")])).unwrap();
    fs::write(&french, resx(&[("B", "Banane"), ("C", "Cerise")])).unwrap();

    let out = resxsync_cmd()
        .arg(temp_dir.path())
        .arg("--error-log")
        .arg(temp_dir.path().join("LastError.txt"))
        .output()
        .unwrap();

    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Updated strings.resx: +1 (C)"));
    assert!(stdout.contains("Updated strings.fr.resx: +1 (A)"));

    let default_text = fs::read_to_string(&default).unwrap();
    assert!(default_text.contains("<data name=\"C\" xml:space=\"preserve\">"));
    assert!(default_text.contains("<value>Cerise</value>"));
    let french_text = fs::read_to_string(&french).unwrap();
    assert!(french_text.contains("<value>F_Apple</value>"));
    assert!(!temp_dir.path().join("LastError.txt").exists());
}

#[test]
fn test_second_run_reports_in_sync() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Strings.resx"), resx(&[("A", "a")])).unwrap();
    fs::write(temp_dir.path().join("Strings.de.resx"), resx(&[("B", "b")])).unwrap();

    let first = resxsync_cmd().arg(temp_dir.path()).output().unwrap();
    assert!(first.status.success());

    let second = resxsync_cmd().arg(temp_dir.path()).output().unwrap();
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("All 2 files already in sync"));
    assert!(!stdout.contains("Updated"));
}

#[test]
fn test_dry_run_does_not_write() {
    let temp_dir = TempDir::new().unwrap();
    let french = temp_dir.path().join("Strings.fr.resx");
    fs::write(temp_dir.path().join("Strings.resx"), resx(&[("A", "a")])).unwrap();
    fs::write(&french, resx(&[])).unwrap();
    let before = fs::read_to_string(&french).unwrap();

    let out = resxsync_cmd()
        .arg(temp_dir.path())
        .arg("--dry-run")
        .output()
        .unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Would update Strings.fr.resx: +1 (A)"));
    assert!(stdout.contains("Dry-run mode: no files were written"));
    assert_eq!(fs::read_to_string(&french).unwrap(), before);
}

#[test]
fn test_report_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Strings.resx"), resx(&[("A", "a")])).unwrap();
    fs::write(temp_dir.path().join("Strings.it.resx"), resx(&[])).unwrap();
    let report = temp_dir.path().join("reports").join("resx.json");

    let out = resxsync_cmd()
        .arg(temp_dir.path())
        .arg("--report-json")
        .arg(&report)
        .output()
        .unwrap();

    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["dry_run"], false);
    assert_eq!(json["summary"]["files"], 2);
    assert_eq!(json["files"][0]["locale_tag"], "I_");
    assert_eq!(json["files"][0]["added"][0], "A");
    assert_eq!(json["files"][1]["is_default"], true);
}

#[test]
fn test_missing_folder_fails_and_writes_error_log() {
    let temp_dir = TempDir::new().unwrap();
    let error_log = temp_dir.path().join("LastError.txt");

    let out = resxsync_cmd()
        .arg(temp_dir.path().join("does-not-exist"))
        .arg("--error-log")
        .arg(&error_log)
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error: Folder not found"));
    let record = fs::read_to_string(&error_log).unwrap();
    assert!(record.starts_with("Folder not found"));
}

#[test]
fn test_folder_without_default_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let french = temp_dir.path().join("Strings.fr.resx");
    fs::write(&french, resx(&[("A", "a")])).unwrap();
    let error_log = temp_dir.path().join("err.txt");

    let out = resxsync_cmd()
        .arg(temp_dir.path())
        .env("RESXSYNC_ERROR_LOG", &error_log)
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("cannot find default resource file"));
    assert!(fs::read_to_string(&error_log).unwrap().contains("default resource file"));
}

#[test]
fn test_empty_folder_fails() {
    let temp_dir = TempDir::new().unwrap();
    let out = resxsync_cmd()
        .arg(temp_dir.path())
        .arg("--error-log")
        .arg(temp_dir.path().join("LastError.txt"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No .resx files in folder"));
}

#[test]
fn test_malformed_file_fails_without_writes() {
    let temp_dir = TempDir::new().unwrap();
    let default = temp_dir.path().join("Strings.resx");
    fs::write(&default, resx(&[("A", "a")])).unwrap();
    fs::write(temp_dir.path().join("Strings.fr.resx"), "<root><data name=\"B\">").unwrap();
    let before = fs::read_to_string(&default).unwrap();

    let out = resxsync_cmd()
        .arg(temp_dir.path())
        .arg("--error-log")
        .arg(temp_dir.path().join("LastError.txt"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Strings.fr.resx"));
    assert_eq!(fs::read_to_string(&default).unwrap(), before);
}

#[test]
fn test_requires_folder_argument() {
    let out = resxsync_cmd().output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("<DIR>"));
}
