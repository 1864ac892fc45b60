use serde::Serialize;

/// Qualifier on the `all` mechanism, ranked from strongest to weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllQualifier {
    /// `-all`
    Fail,
    /// `~all`
    SoftFail,
    /// `?all`
    Neutral,
    /// `+all`, or `all` with no explicit qualifier
    Pass,
}

impl AllQualifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(AllQualifier::Fail),
            '~' => Some(AllQualifier::SoftFail),
            '?' => Some(AllQualifier::Neutral),
            '+' => Some(AllQualifier::Pass),
            _ => None,
        }
    }

    /// The mechanism as written in a record, e.g. `"-all"`.
    pub fn mechanism_str(&self) -> &'static str {
        match self {
            AllQualifier::Fail => "-all",
            AllQualifier::SoftFail => "~all",
            AllQualifier::Neutral => "?all",
            AllQualifier::Pass => "+all",
        }
    }
}

impl Serialize for AllQualifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.mechanism_str())
    }
}

/// Structural scan of an SPF record for assessment purposes.
///
/// This is not an evaluator: it extracts the `all` qualifier, counts
/// DNS-lookup-consuming terms, and records the include/redirect targets.
/// Unknown or malformed terms are skipped rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpfScan {
    pub all_qualifier: Option<AllQualifier>,
    /// Number of terms that consume a DNS lookup at evaluation time:
    /// every `include`, `a`, `mx`, `ptr`, `exists` mechanism and the
    /// `redirect` modifier, each counted once whether or not it carries
    /// an explicit domain (RFC 7208 section 4.6.4).
    pub lookup_count: u32,
    pub includes: Vec<String>,
    pub redirect: Option<String>,
    pub has_ptr: bool,
}

/// Scan the body of an SPF record. The caller has already verified the
/// `v=spf1` version tag; `record` is the full record text.
pub fn scan_record(record: &str) -> SpfScan {
    let mut scan = SpfScan::default();

    for term in record.split_whitespace().skip(1) {
        // Modifiers use `name=value`.
        if let Some((name, value)) = term.split_once('=') {
            if name.eq_ignore_ascii_case("redirect") {
                scan.lookup_count += 1;
                if scan.redirect.is_none() && !value.is_empty() {
                    scan.redirect = Some(value.to_string());
                }
            }
            continue;
        }

        let (qualifier, rest) = match term.chars().next().and_then(AllQualifier::from_char) {
            Some(q) => (Some(q), &term[1..]),
            None => (None, term),
        };

        let (mech, arg) = match rest.find([':', '/']) {
            Some(pos) => (&rest[..pos], rest.get(pos + 1..).unwrap_or("")),
            None => (rest, ""),
        };

        match mech.to_ascii_lowercase().as_str() {
            "all" => {
                if scan.all_qualifier.is_none() {
                    scan.all_qualifier = Some(qualifier.unwrap_or(AllQualifier::Pass));
                }
            }
            "include" => {
                scan.lookup_count += 1;
                if !arg.is_empty() {
                    scan.includes.push(arg.to_string());
                }
            }
            "a" | "mx" | "exists" => {
                scan.lookup_count += 1;
            }
            "ptr" => {
                scan.lookup_count += 1;
                scan.has_ptr = true;
            }
            // ip4/ip6 and unknown mechanisms consume no lookups.
            _ => {}
        }
    }

    scan
}
