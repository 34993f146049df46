//! Key path helpers: splitting, ancestry, indentation and raw key tokens.
//!
//! Paths are split on the separator character itself, so separators that
//! happen to be regex metacharacters need no escaping.

/// Default separator between key path segments
pub const DEFAULT_SEPARATOR: char = '.';

/// One indentation level of generated text
pub const INDENT_UNIT: &str = "  ";

pub fn split(path: &str, separator: char) -> Vec<&str> {
    path.split(separator).collect()
}

/// Append `segment` to `prefix`, inserting the separator when `prefix` is not
/// empty.
pub fn join(prefix: &str, segment: &str, separator: char) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        let mut joined = String::with_capacity(prefix.len() + segment.len() + 1);
        joined.push_str(prefix);
        joined.push(separator);
        joined.push_str(segment);
        joined
    }
}

/// True when `candidate` is a strict descendant of `parent`. An exact match is
/// not a sub key, and an empty parent has no sub keys.
pub fn is_sub_key_of(parent: &str, candidate: &str, separator: char) -> bool {
    if parent.is_empty() {
        return false;
    }
    candidate
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with(separator))
}

/// Indentation for a path depth; depth 0 has none.
pub fn indent_for_depth(depth: usize) -> String {
    INDENT_UNIT.repeat(depth)
}

/// Indent every line of a newline-terminated comment block. The empty line
/// after the final newline is left alone.
pub fn indent_block(block: &str, indent: &str) -> String {
    let body = block.strip_suffix('\n').unwrap_or(block);
    let mut out = String::with_capacity(block.len() + indent.len() * 4);
    out.push_str(indent);
    out.push_str(&body.replace('\n', &format!("\n{indent}")));
    out.push('\n');
    out
}

/// Shift every line after the first by `indent`.
pub fn reindent(text: &str, indent: &str) -> String {
    if indent.is_empty() {
        return text.to_string();
    }
    text.replace('\n', &format!("\n{indent}"))
}

/// Extract the key declared by a trimmed raw line.
///
/// A quoted key yields its inner text. An unquoted key ends at the first `:`
/// followed by whitespace or the end of the line; a line without one is taken
/// whole.
pub fn key_token(line: &str) -> String {
    let line = line.trim();
    if let Some(quote @ ('\'' | '"')) = line.chars().next() {
        if let Some(token) = quoted_key(&line[1..], quote) {
            return token;
        }
        return unquoted_key(line).replace(['\'', '"'], "");
    }
    unquoted_key(line).to_string()
}

fn unquoted_key(line: &str) -> &str {
    for (index, c) in line.char_indices() {
        if c != ':' {
            continue;
        }
        let next = line[index + 1..].chars().next();
        if next.map_or(true, char::is_whitespace) {
            return line[..index].trim_end();
        }
    }
    line
}

fn quoted_key(rest: &str, quote: char) -> Option<String> {
    let mut token = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' if quote == '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    token.push('\'');
                } else {
                    return Some(token);
                }
            }
            '"' if quote == '"' => return Some(token),
            '\\' if quote == '"' => {
                let escaped = chars.next()?;
                token.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
            other => token.push(other),
        }
    }
    None
}
