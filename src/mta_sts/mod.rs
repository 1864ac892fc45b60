//! MTA-STS assessment (RFC 8461): discovery TXT record plus the HTTPS
//! policy document.

mod policy;

pub use policy::{parse_policy, pattern_matches, StsMode, StsPolicy};

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::common::dns::DnsResolver;
use crate::common::http::HttpFetcher;
use crate::common::issue::Issue;
use crate::common::tags::{get_tag, has_version_tag, parse_tag_list};
use crate::common::CheckError;
use crate::report::MechanismReport;

/// One day; shorter policy lifetimes give little downgrade protection.
const MIN_MAX_AGE: u64 = 86_400;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MtaStsReport {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Whether the HTTPS policy document was fetched and parsed.
    pub policy_fetched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<StsMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
    pub mx_patterns: Vec<String>,
    pub issues: Vec<Issue>,
}

impl MechanismReport for MtaStsReport {
    const MECHANISM: &'static str = "MTA-STS";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("MTA-STS check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

pub struct MtaStsChecker<R: DnsResolver, H: HttpFetcher> {
    resolver: R,
    http: H,
}

impl<R: DnsResolver, H: HttpFetcher> MtaStsChecker<R, H> {
    pub fn new(resolver: R, http: H) -> Self {
        Self { resolver, http }
    }

    pub async fn check(&self, domain: &str, timeout: Duration) -> Result<MtaStsReport, CheckError> {
        let name = format!("_mta-sts.{domain}");
        let records = match self.resolver.query_txt(&name).await {
            Ok(records) => records,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let sts_records: Vec<&String> = records
            .iter()
            .filter(|r| has_version_tag(r, "v=STSv1"))
            .collect();

        if sts_records.is_empty() {
            debug!(domain, "no MTA-STS record");
            return Ok(MtaStsReport {
                issues: vec![Issue::low("No MTA-STS record found").with_recommendation(
                    "Publish an MTA-STS policy to protect inbound mail against \
                     TLS downgrade attacks",
                )],
                ..MtaStsReport::default()
            });
        }

        let mut issues = Vec::new();
        if sts_records.len() > 1 {
            issues.push(
                Issue::medium(format!(
                    "Multiple MTA-STS records found ({})",
                    sts_records.len()
                ))
                .with_recommendation("Remove all but one MTA-STS record"),
            );
        }

        let tags = parse_tag_list(sts_records[0]);
        let record_id = get_tag(&tags, "id").filter(|v| !v.is_empty()).map(str::to_string);
        if record_id.is_none() {
            issues.push(
                Issue::medium("MTA-STS record has no id= tag; receivers cannot detect \
                               policy updates")
                    .with_recommendation("Add an id= tag and change it on every policy update"),
            );
        }

        // The policy document itself lives behind a fixed well-known URL.
        let url = format!("https://mta-sts.{domain}/.well-known/mta-sts.txt");
        let mut report = MtaStsReport {
            found: true,
            record_id,
            ..MtaStsReport::default()
        };

        match self.http.fetch_text(&url, timeout).await {
            Ok(body) => {
                let policy = parse_policy(&body);
                report.policy_fetched = true;
                report.mode = policy.mode;
                report.max_age = policy.max_age;
                report.mx_patterns = policy.mx_patterns;

                if !policy.version_ok {
                    issues.push(Issue::medium(
                        "MTA-STS policy document is missing \"version: STSv1\"",
                    ));
                }
                match policy.mode {
                    Some(StsMode::Enforce) => {}
                    Some(StsMode::Testing) => {
                        issues.push(
                            Issue::low("MTA-STS policy is in testing mode; delivery failures \
                                        are reported but not enforced")
                                .with_recommendation("Switch the policy to mode: enforce"),
                        );
                    }
                    Some(StsMode::None) => {
                        issues.push(
                            Issue::medium("MTA-STS policy mode is none; the policy is inert")
                                .with_recommendation("Set the policy to mode: enforce"),
                        );
                    }
                    None => {
                        issues.push(Issue::medium(
                            "MTA-STS policy document has no valid mode",
                        ));
                    }
                }
                if report.mx_patterns.is_empty() {
                    issues.push(Issue::medium(
                        "MTA-STS policy lists no mx entries; it cannot match any MX host",
                    ));
                }
                if let Some(age) = report.max_age {
                    if age < MIN_MAX_AGE {
                        issues.push(
                            Issue::low(format!(
                                "MTA-STS max_age is only {age} seconds; short lifetimes \
                                 weaken downgrade protection"
                            ))
                            .with_recommendation(
                                "Raise max_age to at least 86400 (a week or more is typical)",
                            ),
                        );
                    }
                }
            }
            Err(e) => {
                issues.push(
                    Issue::high(format!(
                        "MTA-STS record exists but the policy document could not be \
                         fetched from {url}: {e}"
                    ))
                    .with_recommendation(
                        "Serve the policy at https://mta-sts.<domain>/.well-known/mta-sts.txt",
                    ),
                );
            }
        }

        report.issues = issues;
        Ok(report)
    }
}
