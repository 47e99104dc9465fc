//! INI text codec.
//!
//! Section headers nest on dots (`[server.http]` becomes `server -> http`),
//! `key[]=v` lines append to an array, and the bare literals `true`, `false`
//! and `null` decode to their JSON counterparts. Everything else stays a
//! string. Lines starting with `;` or `#` are comments, as is anything after
//! an unescaped `;` or `#` in an unquoted value.
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IniError {
    #[error("Line {line}: section '{section}' collides with an existing value")]
    SectionConflict { line: usize, section: String },

    #[error("Line {line}: key '{key}' collides with an existing value")]
    KeyConflict { line: usize, key: String },

    #[error("INI can only encode a mapping at the top level, got {0}")]
    NotAMapping(&'static str),

    #[error("Cannot encode {found} at '{path}' as an INI value")]
    UnsupportedValue { path: String, found: &'static str },
}

/// Decode INI text into a JSON mapping.
pub fn parse(text: &str) -> Result<Value, IniError> {
    let mut root = Map::new();
    let mut section: Vec<String> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = split_section(name);
            section_map(&mut root, &section).ok_or_else(|| IniError::SectionConflict {
                line: line_no,
                section: name.to_string(),
            })?;
            continue;
        }

        let (raw_key, raw_value) = match split_assignment(line) {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (line, None),
        };
        let value = raw_value.map(decode_value).unwrap_or(Value::Bool(true));

        let target = section_map(&mut root, &section).ok_or_else(|| IniError::SectionConflict {
            line: line_no,
            section: section.join("."),
        })?;

        match raw_key.strip_suffix("[]") {
            Some(array_key) => {
                let key = unquote(array_key.trim());
                match target.entry(key.clone()).or_insert_with(|| Value::Array(Vec::new())) {
                    Value::Array(items) => items.push(value),
                    _ => return Err(IniError::KeyConflict { line: line_no, key }),
                }
            }
            None => {
                target.insert(unquote(raw_key), value);
            }
        }
    }

    Ok(Value::Object(root))
}

/// Encode a JSON mapping as INI text.
///
/// Scalars and arrays of scalars are written first, nested mappings follow
/// as sections named by their dotted path.
pub fn stringify(value: &Value) -> Result<String, IniError> {
    match value {
        Value::Object(map) => {
            let mut out = String::new();
            encode_section(map, "", &mut out)?;
            Ok(out)
        }
        other => Err(IniError::NotAMapping(crate::key::value_kind(other))),
    }
}

fn encode_section(map: &Map<String, Value>, section: &str, out: &mut String) -> Result<(), IniError> {
    let mut body = String::new();
    let mut children = Vec::new();

    for (key, value) in map {
        match value {
            Value::Object(child) => children.push((key, child)),
            Value::Array(items) => {
                for item in items {
                    let encoded = encode_value(item).ok_or_else(|| unsupported(section, key, item))?;
                    body.push_str(&format!("{}[]={}\n", encode_key(key), encoded));
                }
            }
            scalar => {
                let encoded = encode_value(scalar).ok_or_else(|| unsupported(section, key, scalar))?;
                body.push_str(&format!("{}={}\n", encode_key(key), encoded));
            }
        }
    }

    if !section.is_empty() && !body.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", section));
    }
    out.push_str(&body);

    for (key, child) in children {
        let escaped = key.replace('.', "\\.");
        let name = if section.is_empty() {
            escaped
        } else {
            format!("{}.{}", section, escaped)
        };
        encode_section(child, &name, out)?;
    }
    Ok(())
}

fn unsupported(section: &str, key: &str, value: &Value) -> IniError {
    let path = if section.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", section, key)
    };
    IniError::UnsupportedValue {
        path,
        found: crate::key::value_kind(value),
    }
}

/// Split `key=value` on the first `=` outside a quoted key.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let key_end = match line.chars().next() {
        Some(quote @ ('"' | '\'')) => closing_quote(line, quote).map_or(0, |at| at + 1),
        _ => 0,
    };
    let at = key_end + line[key_end..].find('=')?;
    Some((&line[..at], &line[at + 1..]))
}

/// Byte offset of the quote closing the one that opens `text`.
fn closing_quote(text: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (at, c) in text.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' && quote == '"' {
            escaped = true;
        } else if c == quote {
            return Some(at);
        }
    }
    None
}

/// Split a section name on unescaped dots.
fn split_section(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = name.trim().chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Walk (creating) to the mapping for `section`. `None` if a scalar is in the way.
fn section_map<'a>(root: &'a mut Map<String, Value>, section: &[String]) -> Option<&'a mut Map<String, Value>> {
    let mut current = root;
    for name in section {
        let next = current
            .entry(name.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = next.as_object_mut()?;
    }
    Some(current)
}

fn decode_value(raw: &str) -> Value {
    if is_quoted(raw) {
        return Value::String(unquote(raw));
    }
    let cleaned = strip_comment(raw);
    if is_quoted(&cleaned) {
        return Value::String(unquote(&cleaned));
    }
    match cleaned.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(cleaned),
    }
}

fn is_quoted(raw: &str) -> bool {
    raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"')) || (raw.starts_with('\'') && raw.ends_with('\'')))
}

fn unquote(raw: &str) -> String {
    if !is_quoted(raw) {
        return raw.to_string();
    }
    if raw.starts_with('"') {
        if let Ok(decoded) = serde_json::from_str::<String>(raw) {
            return decoded;
        }
    }
    raw[1..raw.len() - 1].to_string()
}

/// Drop an inline comment and resolve `\;` / `\#` escapes.
fn strip_comment(raw: &str) -> String {
    let mut out = String::new();
    let mut escaped = false;
    for c in raw.chars() {
        if escaped {
            if c != ';' && c != '#' {
                out.push('\\');
            }
            out.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ';' | '#' => break,
            _ => out.push(c),
        }
    }
    if escaped {
        out.push('\\');
    }
    out.trim().to_string()
}

fn encode_key(key: &str) -> String {
    if needs_quotes(key) || key.contains('=') || key.starts_with('[') {
        quote(key)
    } else {
        key.to_string()
    }
}

fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => {
            // Strings that would decode as literals keep their quotes
            let literal = matches!(s.as_str(), "true" | "false" | "null");
            Some(if literal || needs_quotes(s) { quote(s) } else { s.clone() })
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.trim() != s
        || s.contains([';', '#', '\n', '\r'])
        || s.starts_with('"')
        || s.starts_with('\'')
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}
