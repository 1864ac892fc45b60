//! SPF policy record assessment (RFC 7208). Inspects the published record;
//! does not evaluate it against a sending IP.

mod parser;

pub use parser::{scan_record, AllQualifier, SpfScan};

use serde::Serialize;
use tracing::debug;

use crate::common::dns::DnsResolver;
use crate::common::issue::Issue;
use crate::common::tags::has_version_tag;
use crate::common::CheckError;
use crate::report::MechanismReport;

/// RFC 7208 section 4.6.4 hard limit on DNS-lookup-consuming terms.
const LOOKUP_LIMIT: u32 = 10;
/// Lookup count at which we start warning before the limit is hit.
const LOOKUP_WARN: u32 = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpfReport {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    /// Qualifier of the `all` mechanism, serialized as e.g. `"-all"`.
    #[serde(rename = "mechanism", skip_serializing_if = "Option::is_none")]
    pub all_qualifier: Option<AllQualifier>,
    pub lookup_count: u32,
    pub includes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Record uses the deprecated ptr mechanism.
    pub has_ptr: bool,
    pub issues: Vec<Issue>,
}

impl MechanismReport for SpfReport {
    const MECHANISM: &'static str = "SPF";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("SPF check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

pub struct SpfChecker<R: DnsResolver> {
    resolver: R,
}

impl<R: DnsResolver> SpfChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub async fn check(&self, domain: &str) -> Result<SpfReport, CheckError> {
        let records = match self.resolver.query_txt(domain).await {
            Ok(records) => records,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let spf_records: Vec<&String> = records
            .iter()
            .filter(|r| has_version_tag(r, "v=spf1"))
            .collect();

        if spf_records.is_empty() {
            debug!(domain, "no SPF record");
            return Ok(SpfReport {
                issues: vec![Issue::critical("No SPF record found").with_recommendation(
                    "Publish an SPF record (e.g. \"v=spf1 include:<your-senders> -all\") \
                     so receivers can reject forged mail",
                )],
                ..SpfReport::default()
            });
        }

        let mut issues = Vec::new();
        if spf_records.len() > 1 {
            issues.push(
                Issue::high(format!(
                    "Multiple SPF records found ({}); RFC 7208 requires exactly one and \
                     receivers treat this as a permanent error",
                    spf_records.len()
                ))
                .with_recommendation("Merge all SPF mechanisms into a single TXT record"),
            );
        }

        let record = spf_records[0].trim().to_string();
        let scan = scan_record(&record);

        match scan.all_qualifier {
            Some(AllQualifier::Fail) => {}
            Some(AllQualifier::SoftFail) => {
                issues.push(
                    Issue::low("SPF uses softfail (~all); forged mail is accepted but marked")
                        .with_recommendation(
                            "Move from ~all to -all once all legitimate senders are listed",
                        ),
                );
            }
            Some(AllQualifier::Neutral) => {
                issues.push(
                    Issue::high("SPF all mechanism is neutral (?all), providing no protection")
                        .with_recommendation("Tighten ?all to ~all or -all"),
                );
            }
            Some(AllQualifier::Pass) => {
                issues.push(
                    Issue::critical("SPF record authorizes any sender (+all)")
                        .with_recommendation("Replace +all with -all"),
                );
            }
            None => {
                issues.push(
                    Issue::medium("SPF record has no all mechanism; unlisted senders get \
                                   a neutral result")
                        .with_recommendation("Terminate the SPF record with -all"),
                );
            }
        }

        if scan.lookup_count > LOOKUP_LIMIT {
            issues.push(
                Issue::high(format!(
                    "SPF requires {} DNS lookups, exceeding the RFC 7208 limit of {}; \
                     evaluation yields a permanent error",
                    scan.lookup_count, LOOKUP_LIMIT
                ))
                .with_recommendation(
                    "Flatten include chains or drop unused mechanisms to stay within \
                     10 DNS lookups",
                ),
            );
        } else if scan.lookup_count >= LOOKUP_WARN {
            issues.push(
                Issue::medium(format!(
                    "SPF uses {} of the {} allowed DNS lookups",
                    scan.lookup_count, LOOKUP_LIMIT
                ))
                .with_recommendation("Reduce SPF include depth before hitting the lookup limit"),
            );
        }

        if scan.has_ptr {
            issues.push(
                Issue::medium("SPF uses the deprecated ptr mechanism (RFC 7208 section 5.5)")
                    .with_recommendation("Replace ptr with ip4/ip6 or include mechanisms"),
            );
        }

        Ok(SpfReport {
            found: true,
            record: Some(record),
            all_qualifier: scan.all_qualifier,
            lookup_count: scan.lookup_count,
            includes: scan.includes,
            redirect: scan.redirect,
            has_ptr: scan.has_ptr,
            issues,
        })
    }
}
