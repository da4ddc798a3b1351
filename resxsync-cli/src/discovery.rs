use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use ignore::WalkBuilder;

/// Pattern resource files are matched against (case-insensitive).
pub const RESX_PATTERN: &str = "*.resx";

/// List the resource files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched and ignore files are not honoured: every
/// `.resx` file in the folder takes part in a run.
pub fn find_resource_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let matcher = GlobBuilder::new(RESX_PATTERN)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map_err(|e| format!("Invalid glob pattern '{}': {}", RESX_PATTERN, e))?
        .compile_matcher();

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(true)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut found = Vec::new();
    for dent in walker {
        let dent = dent.map_err(|e| format!("Failed to scan '{}': {}", dir.display(), e))?;
        if dent.depth() == 0 || !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if matcher.is_match(dent.file_name()) {
            found.push(dent.into_path());
        }
    }
    Ok(found)
}
