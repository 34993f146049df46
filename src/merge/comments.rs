//! Comment extraction: attach free-floating comment blocks to the key they
//! precede.
//!
//! Only whole-line comments and blank lines are collected. Comments directly
//! above a list element are not attributed to it; the block is carried
//! forward to the next real key instead.

use crate::document::Document;
use crate::merge::tracker::KeyPathTracker;
use std::collections::HashMap;
use tracing::debug;

/// Comment blocks keyed by the path they precede.
///
/// Every stored block is non-empty and ends with a newline. Lines are stored
/// trimmed; indentation is reapplied when the block is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentMap {
    blocks: HashMap<String, String>,
    trailing: Option<String>,
}

impl CommentMap {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.blocks.get(path).map(String::as_str)
    }

    /// Comments after the last key of the document.
    pub fn trailing(&self) -> Option<&str> {
        self.trailing.as_deref()
    }

    pub fn len(&self) -> usize {
        self.blocks.len() + usize::from(self.trailing.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first block seen for a path is kept.
    fn insert(&mut self, path: String, block: String) {
        self.blocks.entry(path).or_insert(block);
    }
}

/// Single forward pass over `raw`, using `document` (the parse of `raw`) to
/// resolve key paths.
pub fn extract(raw: &str, document: &Document, separator: char) -> CommentMap {
    let keys: Vec<String> = document
        .entries(separator)
        .into_iter()
        .map(|entry| entry.path)
        .collect();
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(keys.len());
    for (index, key) in keys.iter().enumerate() {
        positions.entry(key.as_str()).or_insert(index);
    }

    let mut comments = CommentMap::default();
    let mut pending = String::new();
    let mut tracker = KeyPathTracker::new(document, separator);
    let mut anchor: Option<&str> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('-') {
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            pending.push_str(trimmed);
            pending.push('\n');
            continue;
        }

        if !line.starts_with(char::is_whitespace) {
            tracker.clear();
            anchor = Some(trimmed);
        }

        tracker.parse_line(trimmed, true);
        let path = tracker.path();
        if !pending.is_empty() {
            comments.insert(path.clone(), std::mem::take(&mut pending));
        }

        // Trim the tracker back to what the next declared key shares with it,
        // re-anchoring on the current top-level key if nothing is shared.
        let next = positions.get(path.as_str()).map_or(0, |index| index + 1);
        if let Some(next_key) = keys.get(next) {
            while !tracker.is_empty() && !tracker.is_ancestor_or_self_of(next_key) {
                tracker.remove_last_key();
            }
            if tracker.is_empty() {
                if let Some(anchor) = anchor {
                    tracker.parse_line(anchor, true);
                }
            }
        }
    }

    if !pending.is_empty() {
        comments.trailing = Some(pending);
    }

    debug!(
        blocks = comments.blocks.len(),
        trailing = comments.trailing.is_some(),
        "Extracted comments"
    );
    comments
}
