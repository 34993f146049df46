//! Key path tracker: follows the dotted path implied by raw key lines.
//!
//! Indentation is never measured. When a new key does not exist under the
//! current path, segments are popped until it does, trusting the parsed tree
//! as ground truth. A tracker is created fresh for every pass over a text.

use crate::document::{self, Document};
use crate::merge::keypath;
use serde_yaml::{Mapping, Value};
use std::fmt;

pub struct KeyPathTracker<'a> {
    document: &'a Document,
    separator: char,
    segments: Vec<String>,
}

impl<'a> KeyPathTracker<'a> {
    pub fn new(document: &'a Document, separator: char) -> Self {
        Self {
            document,
            separator,
            segments: Vec::new(),
        }
    }

    /// Consume one trimmed line that declares a key and move the path onto it.
    ///
    /// With `verify` set, trailing segments are dropped while the tree has no
    /// `current + key` path; this absorbs dedents and sibling transitions.
    /// A key found in the tree is recorded in its canonical spelling, so
    /// `1.50:` and `0x10:` land on the same paths as [`Document::entries`].
    pub fn parse_line(&mut self, line: &str, verify: bool) {
        let token = keypath::key_token(line);
        if verify {
            loop {
                if let Some(segment) = self.child_segment(&token) {
                    self.segments.push(segment);
                    return;
                }
                if self.segments.pop().is_none() {
                    break;
                }
            }
        }
        self.segments.push(token);
    }

    /// Canonical segment of the child `token` names under the current path.
    fn child_segment(&self, token: &str) -> Option<String> {
        let mapping = if self.segments.is_empty() {
            self.document.root()
        } else {
            match self.document.resolve(&self.segments)? {
                Value::Mapping(children) => children,
                _ => return None,
            }
        };
        let key = document::native_key(token, mapping).or_else(|| scalar_key(token, mapping))?;
        Some(document::key_segment(&key))
    }

    pub fn remove_last_key(&mut self) {
        self.segments.pop();
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn path(&self) -> String {
        let separator = self.separator.to_string();
        self.segments.join(&separator)
    }

    /// True iff the current path addresses a Section with at least one child.
    pub fn is_section_with_children(&self) -> bool {
        matches!(
            self.document.resolve(&self.segments),
            Some(Value::Mapping(children)) if !children.is_empty()
        )
    }

    /// True iff the current path is a strict descendant of `parent`.
    pub fn is_sub_key_of(&self, parent: &str) -> bool {
        keypath::is_sub_key_of(parent, &self.path(), self.separator)
    }

    /// True iff `other` is the current path or lies beneath it.
    pub fn is_ancestor_or_self_of(&self, other: &str) -> bool {
        let path = self.path();
        path == other || keypath::is_sub_key_of(&path, other, self.separator)
    }
}

/// Read `token` the way a YAML parser reads a plain scalar, for spellings
/// such as `0x10` or `1e3` that the coercion chain does not cover.
fn scalar_key(token: &str, mapping: &Mapping) -> Option<Value> {
    serde_yaml::from_str::<Value>(token)
        .ok()
        .filter(|key| mapping.contains_key(key))
}

impl fmt::Display for KeyPathTracker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
