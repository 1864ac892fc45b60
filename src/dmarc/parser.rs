use serde::Serialize;

use crate::common::tags::{get_tag, parse_tag_list};

/// DMARC enforcement policy. Values outside `{none, quarantine, reject}`
/// are treated as absent, not as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DmarcPolicy {
    None,
    Quarantine,
    Reject,
}

impl DmarcPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(DmarcPolicy::None),
            "quarantine" => Some(DmarcPolicy::Quarantine),
            "reject" => Some(DmarcPolicy::Reject),
            _ => Option::None,
        }
    }
}

/// Fields extracted from a DMARC record for assessment. Unknown tags are
/// ignored; malformed tag values degrade to their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmarcScan {
    pub policy: Option<DmarcPolicy>,
    pub subdomain_policy: Option<DmarcPolicy>,
    pub rua: Vec<String>,
    pub ruf: Vec<String>,
    /// pct= tag, default 100; out-of-range or unparseable values fall back
    /// to 100.
    pub percent: u8,
}

impl DmarcScan {
    pub fn reporting_enabled(&self) -> bool {
        !self.rua.is_empty() || !self.ruf.is_empty()
    }
}

/// Scan a DMARC record body. The caller has already matched the `v=DMARC1`
/// version tag.
pub fn scan_record(record: &str) -> DmarcScan {
    let tags = parse_tag_list(record);

    let policy = get_tag(&tags, "p").and_then(DmarcPolicy::parse);
    let subdomain_policy = get_tag(&tags, "sp").and_then(DmarcPolicy::parse);

    let rua = get_tag(&tags, "rua").map(split_addresses).unwrap_or_default();
    let ruf = get_tag(&tags, "ruf").map(split_addresses).unwrap_or_default();

    let percent = get_tag(&tags, "pct")
        .and_then(|v| v.trim().parse::<u8>().ok())
        .filter(|p| *p <= 100)
        .unwrap_or(100);

    DmarcScan {
        policy,
        subdomain_policy,
        rua,
        ruf,
        percent,
    }
}

fn split_addresses(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_reject_with_reporting() {
        let scan = scan_record("v=DMARC1; p=reject; rua=mailto:dmarc@example.com");
        assert_eq!(scan.policy, Some(DmarcPolicy::Reject));
        assert!(scan.reporting_enabled());
        assert_eq!(scan.rua, vec!["mailto:dmarc@example.com"]);
        assert_eq!(scan.percent, 100);
    }

    #[test]
    fn scan_multiple_rua_addresses() {
        let scan = scan_record("v=DMARC1; p=none; rua=mailto:a@x.com, mailto:b@y.com");
        assert_eq!(scan.rua.len(), 2);
        assert_eq!(scan.rua[1], "mailto:b@y.com");
    }

    #[test]
    fn scan_invalid_policy_treated_as_absent() {
        let scan = scan_record("v=DMARC1; p=block");
        assert_eq!(scan.policy, None);
    }

    #[test]
    fn scan_subdomain_policy() {
        let scan = scan_record("v=DMARC1; p=reject; sp=none");
        assert_eq!(scan.subdomain_policy, Some(DmarcPolicy::None));
    }

    #[test]
    fn scan_pct() {
        let scan = scan_record("v=DMARC1; p=quarantine; pct=50");
        assert_eq!(scan.percent, 50);
    }

    #[test]
    fn scan_pct_out_of_range_defaults() {
        let scan = scan_record("v=DMARC1; p=reject; pct=150");
        assert_eq!(scan.percent, 100);
    }

    #[test]
    fn scan_pct_garbage_defaults() {
        let scan = scan_record("v=DMARC1; p=reject; pct=half");
        assert_eq!(scan.percent, 100);
    }

    #[test]
    fn scan_no_reporting() {
        let scan = scan_record("v=DMARC1; p=reject");
        assert!(!scan.reporting_enabled());
    }

    #[test]
    fn scan_case_insensitive_tags() {
        let scan = scan_record("v=DMARC1; P=Reject; RUA=mailto:x@y.com");
        assert_eq!(scan.policy, Some(DmarcPolicy::Reject));
        assert!(scan.reporting_enabled());
    }

    #[test]
    fn policy_ordering() {
        assert!(DmarcPolicy::Reject > DmarcPolicy::Quarantine);
        assert!(DmarcPolicy::Quarantine > DmarcPolicy::None);
    }
}
