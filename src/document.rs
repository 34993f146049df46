//! Document model: ordered YAML key/value tree backed by `serde_yaml`.
//!
//! A node is either a Section (a `serde_yaml::Mapping`) or a Leaf (any other
//! value). Map keys keep their native YAML type, so lookups by string segment
//! go through [`native_key`], which coerces the segment the way the stored
//! key was written.

use crate::error::{DocumentError, UpdateError};
use crate::merge::keypath;
use serde_yaml::{Mapping, Number, Value};
use std::path::Path;

/// Parsed YAML document whose root is always a Section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Mapping,
}

/// One key path of a document, in declaration order.
#[derive(Debug, Clone)]
pub struct PathEntry<'a> {
    /// Segments joined with the separator
    pub path: String,
    /// Native keys from the root down to this entry
    pub keys: Vec<&'a Value>,
    /// Value stored under the last key
    pub value: &'a Value,
}

impl<'a> PathEntry<'a> {
    /// Nesting depth; top-level keys are depth 0.
    pub fn depth(&self) -> usize {
        self.keys.len().saturating_sub(1)
    }

    /// The native key of this entry.
    pub fn key(&self) -> &'a Value {
        self.keys[self.keys.len() - 1]
    }

    pub fn is_section(&self) -> bool {
        self.value.is_mapping()
    }
}

impl Document {
    /// Parse one YAML document. Empty and comment-only documents are an empty
    /// root Section.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let blank = text.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::default());
        }

        match serde_yaml::from_str::<Value>(text).map_err(DocumentError::Parse)? {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            other => Err(DocumentError::NotAMapping(kind_name(&other).to_string())),
        }
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Every key path in declaration order, depth-first pre-order. Lists are
    /// leaves and are never descended into.
    pub fn entries(&self, separator: char) -> Vec<PathEntry<'_>> {
        let mut out = Vec::new();
        let mut keys = Vec::new();
        collect_entries(&self.root, "", &mut keys, separator, &mut out);
        out
    }

    /// Resolve a sequence of string segments, coercing each one to the native
    /// key type stored in its Section.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        let mut mapping = &self.root;
        let mut found: Option<&Value> = None;
        for segment in segments {
            if let Some(value) = found {
                mapping = match value {
                    Value::Mapping(children) => children,
                    _ => return None,
                };
            }
            let key = native_key(segment.as_ref(), mapping)?;
            found = Some(mapping.get(&key)?);
        }
        found
    }

    /// Resolve a chain of native keys (as produced by [`Document::entries`] on
    /// another document). Each key is tried as-is before falling back to the
    /// coercion chain on its display form.
    pub fn lookup(&self, keys: &[&Value]) -> Option<&Value> {
        let mut mapping = &self.root;
        let mut found: Option<&Value> = None;
        for key in keys {
            if let Some(value) = found {
                mapping = match value {
                    Value::Mapping(children) => children,
                    _ => return None,
                };
            }
            let value = match mapping.get(*key) {
                Some(value) => value,
                None => {
                    let coerced = native_key(&key_segment(key), mapping)?;
                    mapping.get(&coerced)?
                }
            };
            found = Some(value);
        }
        found
    }

    /// Resolve a separator-joined path. Adjacent segments are joined back
    /// together when no key matches them one by one, so `levels.1.5` reaches
    /// a float key `1.5`.
    pub fn get(&self, path: &str, separator: char) -> Option<&Value> {
        self.resolve_path(path, separator).map(|(_, value)| value)
    }

    /// Like [`Document::get`], also returning the native keys walked.
    pub fn resolve_path(&self, path: &str, separator: char) -> Option<(Vec<Value>, &Value)> {
        let segments = keypath::split(path, separator);
        let mut keys = Vec::new();
        let value = walk(&self.root, &segments, separator, &mut keys)?;
        Some((keys, value))
    }

    pub fn contains(&self, path: &str, separator: char) -> bool {
        self.get(path, separator).is_some()
    }

    pub fn is_section(&self, path: &str, separator: char) -> bool {
        matches!(self.get(path, separator), Some(Value::Mapping(_)))
    }

    /// Number of direct children of the Section at `path`, or `None` when the
    /// path is missing or addresses a Leaf.
    pub fn section_len(&self, path: &str, separator: char) -> Option<usize> {
        match self.get(path, separator) {
            Some(Value::Mapping(children)) => Some(children.len()),
            _ => None,
        }
    }
}

fn collect_entries<'a>(
    mapping: &'a Mapping,
    prefix: &str,
    keys: &mut Vec<&'a Value>,
    separator: char,
    out: &mut Vec<PathEntry<'a>>,
) {
    for (key, value) in mapping.iter() {
        let path = keypath::join(prefix, &key_segment(key), separator);
        keys.push(key);
        out.push(PathEntry {
            path: path.clone(),
            keys: keys.clone(),
            value,
        });
        if let Value::Mapping(children) = value {
            collect_entries(children, &path, keys, separator, out);
        }
        keys.pop();
    }
}

/// Find the key actually stored in `mapping` for a string segment.
///
/// Tried in order: the string itself, then `f32`, `f64`, `i32` and `i64`
/// parses, then boolean and null spellings. The first candidate present in
/// the mapping wins.
pub fn native_key(segment: &str, mapping: &Mapping) -> Option<Value> {
    let candidates = std::iter::once(Value::String(segment.to_string()))
        .chain(
            segment
                .parse::<f32>()
                .ok()
                .map(|f| Value::Number(Number::from(f64::from(f)))),
        )
        .chain(segment.parse::<f64>().ok().map(|f| Value::Number(Number::from(f))))
        .chain(
            segment
                .parse::<i32>()
                .ok()
                .map(|i| Value::Number(Number::from(i64::from(i)))),
        )
        .chain(segment.parse::<i64>().ok().map(|i| Value::Number(Number::from(i))))
        .chain(segment.parse::<bool>().ok().map(Value::Bool))
        .chain((segment == "null" || segment == "~").then_some(Value::Null));

    candidates.into_iter().find(|candidate| mapping.contains_key(candidate))
}

/// One way of reading the next key of a path.
#[derive(Debug, Clone)]
pub struct Step<'a> {
    /// How many raw segments the key spans
    pub consumed: usize,
    /// The raw segments joined back together
    pub segment: String,
    pub key: Value,
    pub value: &'a Value,
}

/// Every key of `mapping` that a leading run of `segments` names, shortest
/// run first.
pub fn steps<'a>(mapping: &'a Mapping, segments: &[&str], separator: char) -> Vec<Step<'a>> {
    let mut found = Vec::new();
    let mut segment = String::new();
    for (index, raw) in segments.iter().enumerate() {
        if index > 0 {
            segment.push(separator);
        }
        segment.push_str(raw);
        if let Some(key) = native_key(&segment, mapping) {
            if let Some(value) = mapping.get(&key) {
                found.push(Step {
                    consumed: index + 1,
                    segment: segment.clone(),
                    key,
                    value,
                });
            }
        }
    }
    found
}

fn walk<'a>(
    mapping: &'a Mapping,
    segments: &[&str],
    separator: char,
    keys: &mut Vec<Value>,
) -> Option<&'a Value> {
    for step in steps(mapping, segments, separator) {
        let rest = &segments[step.consumed..];
        if rest.is_empty() {
            keys.push(step.key);
            return Some(step.value);
        }
        if let Value::Mapping(children) = step.value {
            keys.push(step.key);
            if let Some(value) = walk(children, rest, separator, keys) {
                return Some(value);
            }
            keys.pop();
        }
    }
    None
}

/// Path segment for a native key.
pub fn key_segment(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|dumped| dumped.trim_end_matches('\n').to_string())
            .unwrap_or_default(),
    }
}

/// Dump a single value. The result ends with a newline.
pub fn dump_value(value: &Value) -> Result<String, DocumentError> {
    serde_yaml::to_string(value).map_err(DocumentError::Serialize)
}

/// Dump exactly one `key: value` pair. The result ends with a newline.
pub fn dump_entry(key: &Value, value: &Value) -> Result<String, DocumentError> {
    let mut single = Mapping::new();
    single.insert(key.clone(), value.clone());
    dump_value(&Value::Mapping(single))
}

/// Render a key the way the serializer would, quoted when needed.
pub fn dump_key(key: &Value) -> Result<String, DocumentError> {
    Ok(dump_value(key)?.trim_end_matches('\n').to_string())
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Raw text of a document together with its parsed tree.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub raw: String,
    pub document: Document,
}

impl LoadedDocument {
    pub fn parse(raw: String) -> Result<Self, DocumentError> {
        let document = Document::parse(&raw)?;
        Ok(Self { raw, document })
    }

    /// Read and parse a UTF-8 file.
    pub fn from_file(path: &Path) -> Result<Self, UpdateError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse(raw)?)
    }
}
