//! Copying an entry from one resource file into another.

use tracing::debug;

use crate::{
    comment::strip_sync_timestamps,
    error::Error,
    formats::{Entry, EntryNode, ResxDocument},
    locale::LocaleTag,
};

/// Deep-clones `entry` out of `source` for insertion into a file tagged `target`.
///
/// The copied value is prefixed with the target's tag so a translator notices
/// it; copies into the default file (empty tag) keep their value. Sync
/// timestamps are stripped from a non-blank comment. Nothing else changes.
pub fn import_entry(
    source: &ResxDocument,
    entry: &Entry,
    target: &LocaleTag,
) -> Result<EntryNode, Error> {
    let mut node = source.clone_entry(entry);

    let value = entry
        .value
        .as_deref()
        .ok_or_else(|| Error::MissingValue(entry.name.clone()))?;
    if !target.is_default() {
        node.set_value(&target.mark(value))?;
    }

    if let Some(comment) = entry.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        let stripped = strip_sync_timestamps(comment);
        if stripped != comment {
            node.set_comment(&stripped);
        }
    }

    debug!(entry = %entry.name, tag = %target, "imported entry");
    Ok(node)
}
