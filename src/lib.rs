#![forbid(unsafe_code)]
//! Keeps sibling `.resx` localization files in sync.
//!
//! Given a default resource file (`Strings.resx`) and its localized siblings
//! (`Strings.fr.resx`, `Strings.de-DE.resx`, ...), a run makes every file hold
//! every entry name found in any of them. Entries copied into a localized file
//! get their value prefixed with a marker such as `F_` so translators can spot
//! them; stale `[LastSync=...,LastChange=...]` stamps are dropped from copied
//! comments. Only files that gained entries are written, so a second run is a
//! no-op.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use resxsync::{ReconcileOptions, reconcile};
//!
//! let files = vec![
//!     PathBuf::from("Resources/Strings.resx"),
//!     PathBuf::from("Resources/Strings.fr.resx"),
//! ];
//! let report = reconcile(&files, ReconcileOptions::new())?;
//! for file in report.changed() {
//!     println!("{}: +{}", file.path.display(), file.added.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod comment;
pub mod error;
pub mod formats;
pub mod import;
pub mod locale;
pub mod reconcile;
pub mod traits;

// Re-export most used types for easy consumption
pub use crate::{
    comment::strip_sync_timestamps,
    error::Error,
    formats::{Entry, EntryNode, ResxDocument, TextEncoding},
    import::import_entry,
    locale::{LocaleTag, select_default},
    reconcile::{
        FileReport, ReconcileOptions, ReconcileReport, Reconciler, ResourceFile, reconcile,
    },
};
