//! Ignored sections: subtrees copied from the target instead of merged.
//!
//! Each ignored path is resolved in the target tree and rebuilt as text,
//! keys, values, nesting and the target's own comments included, so it can be
//! spliced into the output unchanged.

use crate::document::{self, Document};
use crate::error::{DocumentError, IgnoredSectionFault, UpdateError};
use crate::merge::comments::{self, CommentMap};
use crate::merge::keypath;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// One ignored subtree, rebuilt as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredSection {
    /// Path as the caller wrote it
    pub requested: String,
    /// Path rebuilt from the native keys, comparable with template paths
    pub path: String,
    /// Resolved path of the enclosing Section, `None` at the top level
    pub parent: Option<String>,
    pub text: String,
}

/// Reconstructed text for each ignored path, in the order the caller gave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredSectionMap {
    sections: Vec<IgnoredSection>,
}

impl IgnoredSectionMap {
    /// Text for a resolved path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|section| section.path == path)
            .map(|section| section.text.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Resolved ignored paths, in caller order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IgnoredSection> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn insert(&mut self, section: IgnoredSection) {
        match self.sections.iter_mut().find(|existing| existing.path == section.path) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }
}

/// Rebuild every ignored path from the target's raw text and tree.
///
/// Fails on the first path that does not resolve to a Section.
pub fn extract<S: AsRef<str>>(
    raw: &str,
    document: &Document,
    ignored: &[S],
    separator: char,
) -> Result<IgnoredSectionMap, UpdateError> {
    let mut sections = IgnoredSectionMap::default();
    if ignored.is_empty() {
        return Ok(sections);
    }

    // Comments inside ignored sections belong to the user, not the template.
    let comments = comments::extract(raw, document, separator);

    for requested in ignored {
        let requested = requested.as_ref();
        let (keys, value) = resolve_section(requested, document, separator)?;
        let segments: Vec<String> = keys.iter().map(document::key_segment).collect();
        let path = segments.join(&separator.to_string());
        let parent = (segments.len() > 1)
            .then(|| segments[..segments.len() - 1].join(&separator.to_string()));

        let mut text = String::new();
        let key = &keys[keys.len() - 1];
        write_entry(&mut text, &path, keys.len() - 1, key, value, &comments, separator)?;
        debug!(path = %path, bytes = text.len(), "Rebuilt ignored section");
        sections.insert(IgnoredSection {
            requested: requested.to_string(),
            path,
            parent,
            text,
        });
    }

    Ok(sections)
}

/// Resolve `path` in the target tree to a Section. Returns the native keys
/// walked and the Section itself.
fn resolve_section<'a>(
    path: &str,
    document: &'a Document,
    separator: char,
) -> Result<(Vec<Value>, &'a Value), UpdateError> {
    match document.resolve_path(path, separator) {
        Some((keys, value)) if value.is_mapping() => Ok((keys, value)),
        Some(_) => Err(UpdateError::ignored(
            path,
            IgnoredSectionFault::NotASection(path.to_string()),
        )),
        None => Err(UpdateError::ignored(path, diagnose(path, document, separator))),
    }
}

/// Find the first segment of an unresolvable path that breaks the walk.
fn diagnose(path: &str, document: &Document, separator: char) -> IgnoredSectionFault {
    let segments = keypath::split(path, separator);
    let mut rest = &segments[..];
    let mut mapping: &Mapping = document.root();
    let mut walked = String::new();

    while let Some(first) = rest.first() {
        let candidates = document::steps(mapping, rest, separator);
        let Some(step) = candidates
            .iter()
            .find(|step| step.value.is_mapping())
            .or_else(|| candidates.first())
        else {
            return IgnoredSectionFault::Missing(keypath::join(&walked, first, separator));
        };

        walked = keypath::join(&walked, &step.segment, separator);
        rest = &rest[step.consumed..];
        match step.value {
            Value::Mapping(children) if !rest.is_empty() => mapping = children,
            _ if !rest.is_empty() => return IgnoredSectionFault::ParentNotSection(walked),
            _ => break,
        }
    }

    IgnoredSectionFault::NotASection(walked)
}

fn write_entry(
    out: &mut String,
    path: &str,
    depth: usize,
    key: &Value,
    value: &Value,
    comments: &CommentMap,
    separator: char,
) -> Result<(), DocumentError> {
    let indent = keypath::indent_for_depth(depth);
    if let Some(comment) = comments.get(path) {
        out.push_str(&keypath::indent_block(comment, &indent));
    }
    out.push_str(&indent);
    out.push_str(&document::dump_key(key)?);
    out.push(':');

    match value {
        Value::Mapping(children) if children.is_empty() => out.push_str(" {}\n"),
        Value::Mapping(children) => {
            out.push('\n');
            for (child_key, child_value) in children.iter() {
                let child_path = keypath::join(path, &document::key_segment(child_key), separator);
                write_entry(
                    out,
                    &child_path,
                    depth + 1,
                    child_key,
                    child_value,
                    comments,
                    separator,
                )?;
            }
        }
        leaf => write_leaf(out, leaf, &indent)?,
    }
    Ok(())
}

/// Non-empty lists go on follow-up lines at the key's indent; everything else
/// stays inline.
fn write_leaf(out: &mut String, value: &Value, indent: &str) -> Result<(), DocumentError> {
    let dumped = document::dump_value(value)?;
    let body = keypath::reindent(dumped.trim_end_matches('\n'), indent);
    match value {
        Value::Sequence(items) if !items.is_empty() => {
            out.push('\n');
            out.push_str(indent);
        }
        _ => out.push(' '),
    }
    out.push_str(&body);
    out.push('\n');
    Ok(())
}
