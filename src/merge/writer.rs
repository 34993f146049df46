//! Merge writer: replay the template's key order, filling in target values.
//!
//! The template decides structure and order. The target decides leaf values.
//! Ignored sections are spliced in from their prebuilt text, and comments
//! come from the template's comment map.

use crate::document::{self, Document, PathEntry};
use crate::error::DocumentError;
use crate::merge::comments::CommentMap;
use crate::merge::ignored::IgnoredSectionMap;
use crate::merge::keypath;
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Ignored sections absent from the template, grouped by the template entry
/// they are written after. `parents` holds the template Sections that gain
/// children this way.
#[derive(Debug, Default)]
struct Placements<'i> {
    after: HashMap<usize, Vec<&'i str>>,
    parents: HashSet<usize>,
    at_end: Vec<&'i str>,
}

pub fn write(
    template: &Document,
    target: &Document,
    comments: &CommentMap,
    ignored: &IgnoredSectionMap,
    separator: char,
) -> Result<String, DocumentError> {
    let entries = template.entries(separator);
    let placements = place_missing_ignored(&entries, ignored, separator);
    let mut out = String::new();
    let mut inside_ignored: Option<&str> = None;

    for (index, entry) in entries.iter().enumerate() {
        let path = entry.path.as_str();
        if inside_ignored.is_some_and(|root| !keypath::is_sub_key_of(root, path, separator)) {
            inside_ignored = None;
        }

        if inside_ignored.is_none() {
            if let Some(text) = ignored.get(path) {
                out.push_str(text);
                inside_ignored = Some(path);
            } else if !ignored
                .paths()
                .any(|root| keypath::is_sub_key_of(root, path, separator))
            {
                let has_body = placements.parents.contains(&index);
                write_entry(&mut out, entry, target, comments, has_body)?;
            }
        }

        if let Some(paths) = placements.after.get(&index) {
            for path in paths {
                if let Some(text) = ignored.get(path) {
                    out.push_str(text);
                }
            }
        }
    }

    for path in &placements.at_end {
        if let Some(text) = ignored.get(path) {
            out.push_str(text);
        }
    }

    if let Some(trailing) = comments.trailing() {
        out.push_str(trailing);
    }

    debug!(
        keys = entries.len(),
        ignored = ignored.len(),
        bytes = out.len(),
        "Merged document"
    );
    Ok(out)
}

fn write_entry(
    out: &mut String,
    entry: &PathEntry<'_>,
    target: &Document,
    comments: &CommentMap,
    has_placed_children: bool,
) -> Result<(), DocumentError> {
    let indent = keypath::indent_for_depth(entry.depth());
    if let Some(comment) = comments.get(&entry.path) {
        out.push_str(&keypath::indent_block(comment, &indent));
    }

    match entry.value {
        // Children are written by the following iterations.
        Value::Mapping(children) => {
            out.push_str(&indent);
            out.push_str(&document::dump_key(entry.key())?);
            if children.is_empty() && !has_placed_children {
                out.push_str(": {}\n");
            } else {
                out.push_str(":\n");
            }
        }
        default => {
            let value = target
                .lookup(&entry.keys)
                .filter(|value| !value.is_null())
                .unwrap_or(default);
            let dumped = document::dump_entry(entry.key(), value)?;
            out.push_str(&indent);
            out.push_str(&keypath::reindent(dumped.trim_end_matches('\n'), &indent));
            out.push('\n');
        }
    }
    Ok(())
}

/// Decide where ignored sections missing from the template go: after the
/// last entry under their parent Section, or at the end for top-level paths.
/// Paths nested in another ignored path are already part of its text.
fn place_missing_ignored<'i>(
    entries: &[PathEntry<'_>],
    ignored: &'i IgnoredSectionMap,
    separator: char,
) -> Placements<'i> {
    let mut placements = Placements::default();
    if ignored.is_empty() {
        return placements;
    }

    let positions: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (entry.path.as_str(), index))
        .collect();

    for section in ignored.iter() {
        let path = section.path.as_str();
        if positions.contains_key(path)
            || ignored
                .paths()
                .any(|root| keypath::is_sub_key_of(root, path, separator))
        {
            continue;
        }

        match section.parent.as_deref() {
            None => placements.at_end.push(path),
            Some(parent) => match positions.get(parent) {
                Some(&index) if entries[index].is_section() => {
                    let end = last_descendant(entries, index, separator);
                    placements.after.entry(end).or_default().push(path);
                    placements.parents.insert(index);
                }
                _ => warn!(
                    path,
                    parent, "Ignored section has no parent section in the template, dropping it"
                ),
            },
        }
    }

    placements
}

/// Index of the last entry in the subtree rooted at `index` (pre-order keeps
/// a subtree contiguous).
fn last_descendant(entries: &[PathEntry<'_>], index: usize, separator: char) -> usize {
    let root = entries[index].path.as_str();
    entries[index + 1..]
        .iter()
        .take_while(|entry| keypath::is_sub_key_of(root, &entry.path, separator))
        .count()
        + index
}
