//! DMARC policy record assessment (RFC 7489).

mod parser;

pub use parser::{scan_record, DmarcPolicy, DmarcScan};

use serde::Serialize;
use tracing::debug;

use crate::common::dns::DnsResolver;
use crate::common::issue::Issue;
use crate::common::tags::has_version_tag;
use crate::common::CheckError;
use crate::report::MechanismReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DmarcReport {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<DmarcPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain_policy: Option<DmarcPolicy>,
    pub rua: Vec<String>,
    pub ruf: Vec<String>,
    pub reporting_enabled: bool,
    pub percent: u8,
    pub issues: Vec<Issue>,
}

impl DmarcReport {
    /// Whether the published policy actually enforces anything. Used by the
    /// BIMI cross-check.
    pub fn is_enforcing(&self) -> bool {
        matches!(
            self.policy,
            Some(DmarcPolicy::Quarantine) | Some(DmarcPolicy::Reject)
        )
    }
}

impl MechanismReport for DmarcReport {
    const MECHANISM: &'static str = "DMARC";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("DMARC check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

pub struct DmarcChecker<R: DnsResolver> {
    resolver: R,
}

impl<R: DnsResolver> DmarcChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub async fn check(&self, domain: &str) -> Result<DmarcReport, CheckError> {
        let name = format!("_dmarc.{domain}");
        let records = match self.resolver.query_txt(&name).await {
            Ok(records) => records,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let dmarc_records: Vec<&String> = records
            .iter()
            .filter(|r| has_version_tag(r, "v=DMARC1"))
            .collect();

        if dmarc_records.is_empty() {
            debug!(domain, "no DMARC record");
            return Ok(DmarcReport {
                percent: 100,
                issues: vec![Issue::critical("No DMARC record found").with_recommendation(
                    "Publish a DMARC record at _dmarc.<domain>, starting with \
                     \"v=DMARC1; p=none; rua=mailto:...\" and tightening to p=reject",
                )],
                ..DmarcReport::default()
            });
        }

        let mut issues = Vec::new();
        if dmarc_records.len() > 1 {
            issues.push(
                Issue::high(format!(
                    "Multiple DMARC records found ({}); receivers ignore all of them",
                    dmarc_records.len()
                ))
                .with_recommendation("Remove all but one DMARC record"),
            );
        }

        let record = dmarc_records[0].trim().to_string();
        let scan = scan_record(&record);

        match scan.policy {
            Some(DmarcPolicy::Reject) => {
                if let Some(sp) = scan.subdomain_policy {
                    if sp < DmarcPolicy::Reject {
                        issues.push(
                            Issue::medium(format!(
                                "DMARC policy is reject but subdomain policy is weaker (sp={})",
                                match sp {
                                    DmarcPolicy::None => "none",
                                    DmarcPolicy::Quarantine => "quarantine",
                                    DmarcPolicy::Reject => "reject",
                                }
                            ))
                            .with_recommendation(
                                "Align sp= with p=reject or remove the sp= tag",
                            ),
                        );
                    }
                }
            }
            Some(DmarcPolicy::Quarantine) => {
                issues.push(
                    Issue::low("DMARC policy is quarantine, not reject")
                        .with_recommendation("Move from p=quarantine to p=reject"),
                );
            }
            Some(DmarcPolicy::None) => {
                issues.push(
                    Issue::high("DMARC policy is none (monitoring only); forged mail is \
                                 delivered normally")
                        .with_recommendation(
                            "Move from p=none to p=quarantine, then p=reject",
                        ),
                );
            }
            None => {
                issues.push(
                    Issue::high("DMARC record has no valid p= policy")
                        .with_recommendation("Add a valid p= tag (none, quarantine, or reject)"),
                );
            }
        }

        if !scan.reporting_enabled() {
            issues.push(
                Issue::medium("DMARC reporting is not enabled (no rua= or ruf=)")
                    .with_recommendation(
                        "Add rua=mailto:<address> to receive aggregate reports",
                    ),
            );
        }

        if scan.percent < 100 {
            issues.push(
                Issue::low(format!(
                    "DMARC policy applies to only {}% of messages (pct={})",
                    scan.percent, scan.percent
                ))
                .with_recommendation("Raise pct to 100 once rollout is complete"),
            );
        }

        Ok(DmarcReport {
            found: true,
            record: Some(record),
            policy: scan.policy,
            subdomain_policy: scan.subdomain_policy,
            reporting_enabled: scan.reporting_enabled(),
            rua: scan.rua,
            ruf: scan.ruf,
            percent: scan.percent,
            issues,
        })
    }
}
