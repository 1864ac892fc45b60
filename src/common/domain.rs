/// Normalize a domain: lowercase, strip trailing dot, and reduce a URL to
/// its host (scheme, userinfo, port, path, query stripped).
pub fn normalize(input: &str) -> String {
    let mut s = input.trim();

    // Strip a URL scheme if present.
    if let Some(pos) = s.find("://") {
        s = &s[pos + 3..];
    }
    // Strip userinfo, path/query/fragment, then port.
    if let Some(pos) = s.find('@') {
        s = &s[pos + 1..];
    }
    if let Some(pos) = s.find(['/', '?', '#']) {
        s = &s[..pos];
    }
    if let Some(pos) = s.rfind(':') {
        if s[pos + 1..].chars().all(|c| c.is_ascii_digit()) {
            s = &s[..pos];
        }
    }

    let d = s.to_ascii_lowercase();
    d.strip_suffix('.').unwrap_or(&d).to_string()
}

/// Validate a normalized domain name.
///
/// Accepts two or more dot-separated labels of 1-63 characters, alphanumeric
/// plus interior hyphens, alphabetic TLD of at least two characters, total
/// length at most 253.
pub fn is_valid(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    for label in &labels {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
    }
    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// The TLD (last label) of a normalized domain.
pub fn tld(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}
