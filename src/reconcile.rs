//! Two-pass reconciliation of a set of sibling resource files.
//!
//! Pass 1 copies every entry a localized file has and the default file lacks
//! into the default file. Pass 2 copies every entry of the (now complete)
//! default file that a localized file lacks into that file. After both passes
//! every file holds the union of all entry names.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    formats::ResxDocument,
    import::import_entry,
    locale::{LocaleTag, culture_identifier, culture_name, select_default},
    traits::Parser,
};

/// Options for [`reconcile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Run both passes in memory but write nothing.
    pub dry_run: bool,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// One resource file loaded for the duration of a run.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    path: PathBuf,
    tag: LocaleTag,
    document: ResxDocument,
    added: Vec<String>,
}

impl ResourceFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let document = ResxDocument::read_from(path).map_err(|e| e.in_file(path))?;
        Ok(ResourceFile {
            path: path.to_path_buf(),
            tag: LocaleTag::from_path(path),
            document,
            added: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tag(&self) -> &LocaleTag {
        &self.tag
    }

    pub fn document(&self) -> &ResxDocument {
        &self.document
    }

    /// Names of the entries added during this run, in insertion order.
    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn is_dirty(&self) -> bool {
        !self.added.is_empty()
    }

    /// Imports every entry of `source` whose name this file lacks.
    fn copy_missing_from(&mut self, source: &ResourceFile) -> Result<usize, Error> {
        let mut copied = 0;
        for entry in source.document.entries() {
            if self.document.contains(&entry.name) {
                continue;
            }
            let node = import_entry(&source.document, entry, &self.tag)
                .map_err(|e| e.in_file(&source.path))?;
            self.document
                .append(node)
                .map_err(|e| e.in_file(&self.path))?;
            self.added.push(entry.name.clone());
            copied += 1;
        }
        if copied > 0 {
            debug!(
                from = %source.path.display(),
                to = %self.path.display(),
                copied,
                "copied missing entries"
            );
        }
        Ok(copied)
    }

    /// Replaces the file on disk with the in-memory document.
    ///
    /// The document is written to a temporary file next to the target, which
    /// is then renamed over it.
    pub fn persist(&self) -> Result<(), Error> {
        self.write_atomically().map_err(|e| e.in_file(&self.path))
    }

    fn write_atomically(&self) -> Result<(), Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let permissions = fs::metadata(&self.path)?.permissions();

        let mut tmp = tempfile::Builder::new()
            .prefix(".resxsync-")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        self.document.to_writer(&mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.as_file().set_permissions(permissions)?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn report(&self, is_default: bool, written: bool) -> FileReport {
        FileReport {
            path: self.path.clone(),
            locale_tag: self.tag.to_string(),
            is_default,
            added: self.added.clone(),
            written,
        }
    }
}

/// What a run did to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub locale_tag: String,
    pub is_default: bool,
    pub added: Vec<String>,
    pub written: bool,
}

/// What a run did, file by file, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub default_file: PathBuf,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
}

impl ReconcileReport {
    /// Files that gained at least one entry.
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.added.is_empty())
    }

    pub fn total_added(&self) -> usize {
        self.files.iter().map(|f| f.added.len()).sum()
    }

    /// True if every file already held every entry.
    pub fn is_clean(&self) -> bool {
        self.changed().next().is_none()
    }
}

/// Holds every file of one run; see the module docs for the algorithm.
#[derive(Debug)]
pub struct Reconciler {
    files: Vec<ResourceFile>,
    default: usize,
}

impl Reconciler {
    /// Selects the default file, then loads every file.
    ///
    /// Configuration errors surface before any file is read; a parse error
    /// aborts the load before anything is mutated.
    pub fn load(paths: &[PathBuf]) -> Result<Self, Error> {
        let default_path = select_default(paths)?;
        let default = paths
            .iter()
            .position(|p| p.as_path() == default_path)
            .ok_or(Error::NoDefaultFile)?;

        let mut files = Vec::with_capacity(paths.len());
        for (i, path) in paths.iter().enumerate() {
            if i != default && culture_identifier(path).is_none() {
                warn!(
                    path = %path.display(),
                    culture = %culture_name(path).unwrap_or_default(),
                    "culture segment is not a valid language identifier"
                );
            }
            files.push(ResourceFile::load(path)?);
        }
        debug!(files = files.len(), default = %default_path.display(), "loaded resource files");

        Ok(Reconciler { files, default })
    }

    pub fn files(&self) -> &[ResourceFile] {
        &self.files
    }

    pub fn default_file(&self) -> &ResourceFile {
        &self.files[self.default]
    }

    /// Pass 1: every localized file into the default file.
    pub fn collect_into_default(&mut self) -> Result<usize, Error> {
        let mut copied = 0;
        for i in self.localized() {
            let (source, target) = split_pair(&mut self.files, i, self.default);
            copied += target.copy_missing_from(source)?;
        }
        Ok(copied)
    }

    /// Pass 2: the default file into every localized file.
    pub fn broadcast_from_default(&mut self) -> Result<usize, Error> {
        let mut copied = 0;
        for i in self.localized() {
            let (source, target) = split_pair(&mut self.files, self.default, i);
            copied += target.copy_missing_from(source)?;
        }
        Ok(copied)
    }

    /// Writes every dirty file; returns their paths in input order.
    ///
    /// Stops at the first failure; files written before it stay written.
    pub fn persist(&self) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();
        for file in self.files.iter().filter(|f| f.is_dirty()) {
            file.persist()?;
            info!(path = %file.path.display(), added = file.added.len(), "updated resource file");
            written.push(file.path.clone());
        }
        Ok(written)
    }

    /// Runs both passes, persists unless `options.dry_run`, and reports.
    pub fn run(mut self, options: ReconcileOptions) -> Result<ReconcileReport, Error> {
        let collected = self.collect_into_default()?;
        let broadcast = self.broadcast_from_default()?;
        debug!(collected, broadcast, "reconciliation passes done");

        let written = if options.dry_run {
            Vec::new()
        } else {
            self.persist()?
        };

        Ok(ReconcileReport {
            default_file: self.default_file().path.clone(),
            dry_run: options.dry_run,
            files: self
                .files
                .iter()
                .enumerate()
                .map(|(i, f)| f.report(i == self.default, written.contains(&f.path)))
                .collect(),
        })
    }

    fn localized(&self) -> Vec<usize> {
        (0..self.files.len()).filter(|&i| i != self.default).collect()
    }
}

/// Reconciles `paths` (one default file plus its localized siblings).
pub fn reconcile(paths: &[PathBuf], options: ReconcileOptions) -> Result<ReconcileReport, Error> {
    Reconciler::load(paths)?.run(options)
}

/// Shared access to `files[source]` alongside mutable access to `files[target]`.
fn split_pair(
    files: &mut [ResourceFile],
    source: usize,
    target: usize,
) -> (&ResourceFile, &mut ResourceFile) {
    debug_assert_ne!(source, target);
    if source < target {
        let (left, right) = files.split_at_mut(target);
        (&left[source], &mut right[0])
    } else {
        let (left, right) = files.split_at_mut(source);
        (&right[0], &mut left[target])
    }
}
