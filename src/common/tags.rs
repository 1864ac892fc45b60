/// Parse a semicolon-separated `key=value` tag list (DMARC, DKIM, BIMI,
/// MTA-STS, TLS-RPT record syntax). Single pass; parts without an `=` are
/// dropped rather than rejected so malformed tags degrade to missing fields.
pub fn parse_tag_list(input: &str) -> Vec<(String, String)> {
    let mut tags = Vec::new();
    for part in input.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some((name, value)) = trimmed.split_once('=') {
            tags.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    tags
}

/// First occurrence of a tag, case-insensitive on the name.
pub fn get_tag<'a>(tags: &'a [(String, String)], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Whether a record value starts with the given version tag, ignoring case
/// and leading whitespace (e.g. `has_version_tag(record, "v=DMARC1")`).
pub fn has_version_tag(record: &str, tag: &str) -> bool {
    // Compare on bytes: TXT records carry arbitrary text, and slicing the
    // str by the tag length would panic inside a multibyte character.
    let trimmed = record.trim_start().as_bytes();
    if trimmed.len() < tag.len() {
        return false;
    }
    if !trimmed[..tag.len()].eq_ignore_ascii_case(tag.as_bytes()) {
        return false;
    }
    // The tag must be the whole first token, not a prefix of a longer one.
    matches!(trimmed.get(tag.len()), None | Some(b';') | Some(b' ') | Some(b'\t'))
}
