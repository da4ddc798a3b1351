//! Culture names, translation markers, and default-file selection.
//!
//! Resource files follow the `<base>[.<culture>].resx` naming convention:
//! `Strings.resx` is the locale-neutral default, `Strings.fr-FR.resx` its French
//! counterpart.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// File extension of resource files, without the dot.
pub const RESX_EXTENSION: &str = "resx";

/// The marker prepended to a value copied into a file, so a translator spots it.
///
/// For `Strings.en-US.resx` the tag is `E_`; the default file has an empty tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LocaleTag(String);

impl LocaleTag {
    /// Derives the tag from a file name or full path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let stem = lowercase_stem(path.as_ref());
        match stem.rfind('.') {
            Some(idx) => {
                let mut tag: String = stem[idx + 1..]
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().collect())
                    .unwrap_or_default();
                tag.push('_');
                LocaleTag(tag)
            }
            None => LocaleTag::default(),
        }
    }

    /// True for the default (locale-neutral) file.
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefixes `value` with this tag.
    pub fn mark(&self, value: &str) -> String {
        format!("{}{}", self.0, value)
    }
}

impl Display for LocaleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// File name, lower-cased, with a trailing `.resx` removed.
fn lowercase_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let suffix = format!(".{}", RESX_EXTENSION);
    match name.strip_suffix(&suffix) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// The culture segment of a file name (`en-us` for `Strings.en-US.resx`).
pub fn culture_name<P: AsRef<Path>>(path: P) -> Option<String> {
    let stem = lowercase_stem(path.as_ref());
    stem.rfind('.').map(|idx| stem[idx + 1..].to_string())
}

/// The culture segment parsed as a BCP 47 identifier, if it is one.
pub fn culture_identifier<P: AsRef<Path>>(path: P) -> Option<LanguageIdentifier> {
    culture_name(path).and_then(|name| name.parse().ok())
}

/// Picks the default file: the one whose name carries no culture segment.
///
/// Fails if `paths` is empty, if no file qualifies, or if several do.
pub fn select_default(paths: &[PathBuf]) -> Result<&Path, Error> {
    if paths.is_empty() {
        return Err(Error::NoResourceFiles);
    }

    let candidates: Vec<&PathBuf> = paths
        .iter()
        .filter(|p| LocaleTag::from_path(p).is_default())
        .collect();

    match candidates.as_slice() {
        [] => Err(Error::NoDefaultFile),
        [single] => Ok(single.as_path()),
        many => Err(Error::AmbiguousDefault(
            many.iter().map(|p| p.to_path_buf()).collect(),
        )),
    }
}
