//! Page record decoding.
//!
//! A page record is a text file of `key=value` lines. Only the `text` field
//! is interpreted: its value runs from `text=` up to the next line that
//! starts with one or more lowercase ASCII letters followed by `=`, or to the
//! end of the input, and may itself span several lines.
//!
//! The body is percent-escaped for five characters. Unescaping is a single
//! left-to-right pass, so the `%` produced by `%25` is never re-read as the
//! start of another escape.
//!
//! The `text=` key is only recognized at the start of a line. A plain
//! substring match would also accept `text=` in the middle of another
//! field's value; this decoder deliberately does not.
//!
//! A body line that happens to look like `abc=...` terminates the field
//! early. Stores written by the wiki never contain such a line because raw
//! newlines are always escaped as `%0a`.

use crate::error::{FlatwikiError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::error;

/// Field key holding the page body.
const TEXT_KEY: &str = "text=";

/// Escape tokens and their replacements, in precedence order.
const ESCAPES: [(&str, &str); 5] = [
    ("%0a", "\n"),
    ("%25", "%"),
    ("%22", "\""),
    ("%3c", "<"),
    ("%3e", ">"),
];

fn unescaper() -> &'static AhoCorasick {
    static UNESCAPER: OnceLock<AhoCorasick> = OnceLock::new();
    UNESCAPER.get_or_init(|| {
        AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(ESCAPES.iter().map(|(token, _)| *token))
            .expect("escape tokens form a valid automaton")
    })
}

/// Decode a raw record into its page body.
///
/// Invalid UTF-8 is replaced rather than rejected. A record without a
/// `text=` field decodes to an empty body.
pub fn decode(raw: &[u8]) -> String {
    let content = String::from_utf8_lossy(raw);
    extract_text_field(&content).map(unescape).unwrap_or_default()
}

/// Locate the still-escaped value of the `text` field.
///
/// The key must start a line. The value ends right before the first
/// following newline that introduces a lowercase `key=` line. A single
/// newline at the very end of the input is not part of the value.
pub fn extract_text_field(content: &str) -> Option<&str> {
    let key_start = find_line_key(content, TEXT_KEY)?;
    let start = key_start + TEXT_KEY.len();
    let rest = &content[start..];

    let end = field_boundary(rest)
        .unwrap_or_else(|| rest.strip_suffix('\n').map_or(rest.len(), str::len));
    Some(&rest[..end])
}

/// Find `key` at the start of the input or immediately after a newline.
fn find_line_key(content: &str, key: &str) -> Option<usize> {
    if content.starts_with(key) {
        return Some(0);
    }
    content
        .match_indices('\n')
        .map(|(idx, _)| idx + 1)
        .find(|&line_start| content[line_start..].starts_with(key))
}

/// Offset of the newline that starts the next `[a-z]+=` line, if any.
fn field_boundary(rest: &str) -> Option<usize> {
    rest.match_indices('\n')
        .map(|(idx, _)| idx)
        .find(|&idx| starts_with_lowercase_key(&rest[idx + 1..]))
}

fn starts_with_lowercase_key(line: &str) -> bool {
    let letters = line.bytes().take_while(u8::is_ascii_lowercase).count();
    letters > 0 && line.as_bytes().get(letters) == Some(&b'=')
}

/// Reverse the record escaping in a single pass.
pub fn unescape(escaped: &str) -> String {
    let replacements: Vec<&str> = ESCAPES.iter().map(|(_, plain)| *plain).collect();
    unescaper().replace_all(escaped, &replacements)
}

/// Decode the outcome of reading a record, turning a failed read into
/// [`FlatwikiError::RecordUnreadable`].
pub fn decode_read(name: &str, raw: io::Result<Vec<u8>>) -> Result<String> {
    let bytes = raw.map_err(|e| FlatwikiError::RecordUnreadable {
        path: PathBuf::from(name),
        reason: e.to_string(),
    })?;
    Ok(decode(&bytes))
}

/// Decode the outcome of reading a record, substituting a readable
/// placeholder body when the read failed.
///
/// Used by corpus-wide scans so that one unreadable page does not abort
/// the whole query.
pub fn decode_or_placeholder(name: &str, raw: io::Result<Vec<u8>>) -> String {
    decode_read(name, raw).unwrap_or_else(|err| {
        error!(record = %name, error = %err, "Error reading record");
        placeholder(&err)
    })
}

/// Body returned in place of a record that could not be read.
fn placeholder(err: &FlatwikiError) -> String {
    match err {
        FlatwikiError::RecordUnreadable { reason, .. } => format!("Error reading file: {}", reason),
        other => format!("Error reading file: {}", other),
    }
}
