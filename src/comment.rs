//! Removal of legacy sync timestamps from entry comments.
//!
//! Older localization tooling stamped comments with
//! `[LastSync=GMT2005.12.14 13:15:50,LastChange=GMT2005.10.11 03:33:34]`.
//! Copies made by this crate drop that stamp.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SYNC_TIMESTAMPS_REGEX: Regex = Regex::new(
        r"(?i)^\s*LastSync=GMT\d{4}\.\d{2}\.\d{2} \d{2}:\d{2}:\d{2},LastChange=GMT\d{4}\.\d{2}\.\d{2} \d{2}:\d{2}:\d{2}\s*$"
    )
    .unwrap();
}

/// Returns `comment` without its bracketed sync-timestamp segment.
///
/// The segment runs from the first `[` to the first `]` after it. Comments
/// without such a segment, or whose segment holds anything else, come back
/// unchanged.
pub fn strip_sync_timestamps(comment: &str) -> String {
    let Some((open, close)) = bracketed_segment(comment) else {
        return comment.to_string();
    };
    if !SYNC_TIMESTAMPS_REGEX.is_match(&comment[open + 1..close]) {
        return comment.to_string();
    }

    let remainder = format!("{}{}", &comment[..open], &comment[close + 1..]);
    remainder
        .trim_start_matches(['[', ']', ' '])
        .to_string()
}

/// Byte offsets of the first `[` and the first `]` following it.
fn bracketed_segment(s: &str) -> Option<(usize, usize)> {
    let open = s.find('[')?;
    let close = s[open..].find(']')? + open;
    Some((open, close))
}
