//! BIMI record assessment (brand logo declaration at `default._bimi`).

use serde::Serialize;
use tracing::debug;

use crate::common::dns::DnsResolver;
use crate::common::issue::Issue;
use crate::common::tags::{get_tag, has_version_tag, parse_tag_list};
use crate::common::CheckError;
use crate::report::MechanismReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BimiReport {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    /// `l=` tag: logo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// `a=` tag: Verified Mark Certificate URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmc_url: Option<String>,
    pub issues: Vec<Issue>,
}

impl MechanismReport for BimiReport {
    const MECHANISM: &'static str = "BIMI";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("BIMI check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

pub struct BimiChecker<R: DnsResolver> {
    resolver: R,
}

impl<R: DnsResolver> BimiChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub async fn check(&self, domain: &str) -> Result<BimiReport, CheckError> {
        let name = format!("default._bimi.{domain}");
        let records = match self.resolver.query_txt(&name).await {
            Ok(records) => records,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let bimi_records: Vec<&String> = records
            .iter()
            .filter(|r| has_version_tag(r, "v=BIMI1"))
            .collect();

        if bimi_records.is_empty() {
            debug!(domain, "no BIMI record");
            return Ok(BimiReport {
                issues: vec![Issue::low("No BIMI record found").with_recommendation(
                    "Publish a BIMI record to display your brand logo in supporting inboxes",
                )],
                ..BimiReport::default()
            });
        }

        let mut issues = Vec::new();
        if bimi_records.len() > 1 {
            issues.push(
                Issue::medium(format!(
                    "Multiple BIMI records found ({})",
                    bimi_records.len()
                ))
                .with_recommendation("Remove all but one BIMI record"),
            );
        }

        let record = bimi_records[0].trim().to_string();
        let tags = parse_tag_list(&record);
        let logo_url = get_tag(&tags, "l").filter(|v| !v.is_empty()).map(str::to_string);
        let vmc_url = get_tag(&tags, "a").filter(|v| !v.is_empty()).map(str::to_string);

        match &logo_url {
            None => {
                issues.push(
                    Issue::high("BIMI record has no logo URL (l= tag)")
                        .with_recommendation("Add an l= tag pointing at an SVG logo over HTTPS"),
                );
            }
            Some(url) => {
                if !url.to_ascii_lowercase().starts_with("https://") {
                    issues.push(
                        Issue::high(format!("BIMI logo URL is not HTTPS: {url}"))
                            .with_recommendation("Serve the BIMI logo over HTTPS"),
                    );
                }
                let path = url.split(['?', '#']).next().unwrap_or(url);
                if !path.to_ascii_lowercase().ends_with(".svg") {
                    issues.push(
                        Issue::medium(format!("BIMI logo URL does not point at an SVG: {url}"))
                            .with_recommendation(
                                "BIMI requires the logo in SVG Tiny PS format",
                            ),
                    );
                }
            }
        }

        if vmc_url.is_none() {
            issues.push(
                Issue::low("BIMI record has no VMC certificate (a= tag)").with_recommendation(
                    "Obtain a Verified Mark Certificate; most receivers require one \
                     before showing the logo",
                ),
            );
        }

        Ok(BimiReport {
            found: true,
            record: Some(record),
            logo_url,
            vmc_url,
            issues,
        })
    }
}
