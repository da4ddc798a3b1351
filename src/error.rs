//! All error types for the resxsync crate.
//!
//! Every failure aborts the run: nothing here is recovered from locally.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no resource files to reconcile")]
    NoResourceFiles,

    #[error("cannot find default resource file (one without a culture name in its file name)")]
    NoDefaultFile,

    #[error("more than one default resource file candidate: {}", display_paths(.0))]
    AmbiguousDefault(Vec<PathBuf>),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("entry `{0}` has no <value> element")]
    MissingValue(String),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the file a failure concerns.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Creates a new invalid resource error
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Error::InvalidResource(message.into())
    }

    /// True for failures detected before any file was read.
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::NoResourceFiles | Error::NoDefaultFile | Error::AmbiguousDefault(_) => true,
            Error::File { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
