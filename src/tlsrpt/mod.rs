//! TLS-RPT record assessment (RFC 8460): SMTP TLS reporting endpoint.

use serde::Serialize;
use tracing::debug;

use crate::common::dns::DnsResolver;
use crate::common::issue::Issue;
use crate::common::tags::{get_tag, has_version_tag, parse_tag_list};
use crate::common::CheckError;
use crate::report::MechanismReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TlsRptReport {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    /// Reporting addresses from the rua= tag.
    pub rua: Vec<String>,
    pub issues: Vec<Issue>,
}

impl MechanismReport for TlsRptReport {
    const MECHANISM: &'static str = "TLS-RPT";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("TLS-RPT check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

pub struct TlsRptChecker<R: DnsResolver> {
    resolver: R,
}

impl<R: DnsResolver> TlsRptChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub async fn check(&self, domain: &str) -> Result<TlsRptReport, CheckError> {
        let name = format!("_smtp._tls.{domain}");
        let records = match self.resolver.query_txt(&name).await {
            Ok(records) => records,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let rpt_records: Vec<&String> = records
            .iter()
            .filter(|r| has_version_tag(r, "v=TLSRPTv1"))
            .collect();

        if rpt_records.is_empty() {
            debug!(domain, "no TLS-RPT record");
            return Ok(TlsRptReport {
                issues: vec![Issue::low("No TLS-RPT record found").with_recommendation(
                    "Publish a TLS-RPT record to receive reports about TLS delivery \
                     failures to your domain",
                )],
                ..TlsRptReport::default()
            });
        }

        let mut issues = Vec::new();
        if rpt_records.len() > 1 {
            issues.push(
                Issue::medium(format!(
                    "Multiple TLS-RPT records found ({})",
                    rpt_records.len()
                ))
                .with_recommendation("Remove all but one TLS-RPT record"),
            );
        }

        let record = rpt_records[0].trim().to_string();
        let tags = parse_tag_list(&record);
        let rua: Vec<String> = get_tag(&tags, "rua")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if rua.is_empty() {
            issues.push(
                Issue::medium("TLS-RPT record has no rua= reporting address")
                    .with_recommendation("Add rua=mailto:<address> or rua=https://<endpoint>"),
            );
        } else {
            for addr in &rua {
                let lower = addr.to_ascii_lowercase();
                if !lower.starts_with("mailto:") && !lower.starts_with("https:") {
                    issues.push(
                        Issue::medium(format!(
                            "TLS-RPT reporting address uses an unsupported scheme: {addr}"
                        ))
                        .with_recommendation("Use mailto: or https: reporting addresses"),
                    );
                }
            }
        }

        Ok(TlsRptReport {
            found: true,
            record: Some(record),
            rua,
            issues,
        })
    }
}
