//! Sanitizers for client supplied names and labels.
//!
//! Both functions are idempotent: feeding their output back in returns it unchanged.

use regex::Regex;
use std::sync::LazyLock;

/// Longest file name produced, in UTF-8 bytes. Stays below the usual 255 byte filesystem
/// limit so a `-N` collision suffix still fits.
pub const MAX_FILE_NAME_BYTES: usize = 240;

/// Extensions longer than this (in bytes) are treated as part of the stem when truncating.
const MAX_EXTENSION_BYTES: usize = 16;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>?").expect("tag pattern is valid"));
static OCTET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("octet pattern is valid"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static DASHES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("dash pattern is valid"));

/// Reduce a client supplied file name to a safe, filesystem compatible form.
///
/// Only the last path component is kept, whitespace becomes `-`, anything other than
/// letters, digits, `.`, `-` and `_` is dropped, dash runs are collapsed and leading or
/// trailing dots, dashes and underscores are trimmed. Over-long names are shortened in
/// the stem so the extension survives. The result may be empty.
pub fn sanitize_file_name(raw: &str) -> String {
    let last_component = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let filtered: String = last_component
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let collapsed = DASHES_RE.replace_all(&filtered, "-");
    let trimmed = collapsed.trim_matches(|c| c == '.' || c == '-' || c == '_');
    let truncated = truncate_preserving_extension(trimmed, MAX_FILE_NAME_BYTES);

    truncated
        .trim_matches(|c| c == '.' || c == '-' || c == '_')
        .to_string()
}

fn truncate_preserving_extension(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.len() <= MAX_EXTENSION_BYTES =>
        {
            let stem = truncate_to_char_boundary(stem, max_bytes - ext.len() - 1);
            format!("{}.{}", stem, ext)
        }
        _ => truncate_to_char_boundary(name, max_bytes).to_string(),
    }
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Plain-text sanitizer for short labels such as MIME types and categories.
///
/// Strips markup tags and percent-encoded octets, drops control characters, collapses
/// whitespace to single spaces and trims the ends.
pub fn sanitize_text_field(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let mut without_octets = without_tags.into_owned();
    while OCTET_RE.is_match(&without_octets) {
        without_octets = OCTET_RE.replace_all(&without_octets, "").into_owned();
    }

    let printable: String = without_octets
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    WHITESPACE_RE
        .replace_all(&printable, " ")
        .trim()
        .to_string()
}

/// Stem used to seed temporary file names: the sanitized name without its extension.
pub fn file_stem(sanitized: &str) -> &str {
    match sanitized.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => sanitized,
    }
}
