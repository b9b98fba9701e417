//! MIME allow-list matching.

/// Normalize a MIME type by stripping parameters (e.g. "image/jpeg; q=1" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Whether `mime_type` is covered by the allow-list. Entries may be exact types or
/// `type/*` wildcards; `*/*` allows everything.
pub fn is_allowed(mime_type: &str, allowed: &[String]) -> bool {
    let normalized = normalize_mime_type(mime_type);
    let Some((kind, subtype)) = normalized.split_once('/') else {
        return false;
    };
    if kind.is_empty() || subtype.is_empty() {
        return false;
    }

    allowed.iter().any(|entry| {
        let entry = entry.trim().to_lowercase();
        match entry.split_once('/') {
            Some(("*", "*")) => true,
            Some((allowed_kind, "*")) => allowed_kind == kind,
            _ => entry == normalized,
        }
    })
}
