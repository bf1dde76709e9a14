//! Properties-file parsing.
//!
//! Used for the identity table and for `pom.properties` metadata embedded in
//! live components. The format follows the usual `key=value` conventions:
//!
//! - `#` and `!` start comment lines, blank lines are skipped
//! - a trailing unescaped `\` continues the logical line
//! - the first unescaped `=`, `:` or whitespace separates key from value; a
//!   whitespace separator may be followed by one `=` or `:`
//! - exception: when everything before the first unescaped `=` is free of
//!   unescaped whitespace, that `=` separates, so `g:a:1.0=sym~1.0.0` keeps
//!   its colons in the key without escaping
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded, any other escaped
//!   character stands for itself
//!
//! The exception differs from `java.util.Properties` only for lines such as
//! `key:a=b`, read here as key `key:a` and value `b`. `key: a=b` and
//! `key = a=b` both yield key `key` and value `a=b`.

use std::collections::HashMap;

/// An ordered set of string properties. Duplicate keys keep the last value at
/// the position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses properties text.
    pub fn parse(text: &str) -> Self {
        let mut properties = Properties::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            properties.insert(unescape(key), unescape(value));
        }
        properties
    }

    /// Parses raw resource bytes; invalid UTF-8 sequences are replaced.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// Sets a property, returning the previous value for the key.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// Returns the trimmed value, or `None` when absent or blank.
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for physical in text.lines() {
        let trimmed = physical.trim_start();
        let continuing = current.is_some();
        if !continuing && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!')) {
            continue;
        }

        let (content, continues) = strip_continuation(trimmed);
        let line = current.get_or_insert_with(String::new);
        line.push_str(content);

        if !continues {
            if let Some(done) = current.take() {
                lines.push(done);
            }
        }
    }
    if let Some(rest) = current.filter(|l| !l.trim().is_empty()) {
        lines.push(rest);
    }
    lines
}

/// Removes a trailing continuation backslash. An even run of trailing
/// backslashes is a sequence of escaped backslashes, not a continuation.
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

fn split_entry(line: &str) -> (&str, &str) {
    let coordinate_key = find_unescaped(line, |c| c == '=')
        .filter(|&(at, _)| find_unescaped(&line[..at], char::is_whitespace).is_none());
    let separator = coordinate_key
        .or_else(|| find_unescaped(line, |c| c == '=' || c == ':' || c.is_whitespace()));

    let Some((at, sep)) = separator else {
        return (line.trim_end(), "");
    };

    let key = line[..at].trim_end();
    let mut value = line[at + sep.len_utf8()..].trim_start();
    if sep.is_whitespace() {
        if let Some(rest) = value.strip_prefix([':', '=']) {
            value = rest.trim_start();
        }
    }
    (key, value)
}

fn find_unescaped(line: &str, matches: impl Fn(char) -> bool) -> Option<(usize, char)> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if matches(c) {
            return Some((i, c));
        }
    }
    None
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    // malformed escape: keep it verbatim
                    _ => out.push_str("\\u"),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
