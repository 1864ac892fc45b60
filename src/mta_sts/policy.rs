use serde::Serialize;

/// MTA-STS policy mode (RFC 8461 section 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StsMode {
    Enforce,
    Testing,
    None,
}

impl StsMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "enforce" => Some(StsMode::Enforce),
            "testing" => Some(StsMode::Testing),
            "none" => Some(StsMode::None),
            _ => Option::None,
        }
    }
}

/// Parsed MTA-STS policy document (`.well-known/mta-sts.txt`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StsPolicy {
    pub version_ok: bool,
    pub mode: Option<StsMode>,
    pub max_age: Option<u64>,
    /// `mx:` patterns; a leading `*.` matches one additional label.
    pub mx_patterns: Vec<String>,
}

/// Parse a policy document. `key: value` lines, one pair per line; unknown
/// keys are ignored, malformed lines are skipped.
pub fn parse_policy(body: &str) -> StsPolicy {
    let mut policy = StsPolicy::default();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "version" => policy.version_ok = value.eq_ignore_ascii_case("STSv1"),
            "mode" => policy.mode = StsMode::parse(value),
            "max_age" => policy.max_age = value.parse().ok(),
            "mx" => {
                if !value.is_empty() {
                    policy.mx_patterns.push(value.to_ascii_lowercase());
                }
            }
            _ => {}
        }
    }

    policy
}

/// Whether an MX host is covered by a policy pattern. Exact match, or a
/// `*.` pattern matching exactly one additional label (RFC 8461 section 4.1).
pub fn pattern_matches(pattern: &str, host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let host = host.trim_end_matches('.');
    if let Some(rest) = pattern.strip_prefix("*.") {
        match host.strip_suffix(rest) {
            Some(prefix) => {
                let Some(label) = prefix.strip_suffix('.') else {
                    return false;
                };
                !label.is_empty() && !label.contains('.')
            }
            None => false,
        }
    } else {
        host == pattern.trim_end_matches('.')
    }
}
