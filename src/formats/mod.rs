//! Supported resource file formats.

pub mod resx;

// Reexporting the format for easier access
pub use resx::{Entry, EntryNode, ResxDocument, TextEncoding};
