//! MX record assessment: redundancy, null-MX detection (RFC 7505), and
//! hosted-provider identification.

use serde::Serialize;
use tracing::debug;

use crate::common::dns::DnsResolver;
use crate::common::issue::Issue;
use crate::common::CheckError;
use crate::report::MechanismReport;

/// Suffix-anchored signatures of common hosted mail providers.
static PROVIDER_SIGNATURES: &[(&str, &str)] = &[
    ("google.com", "Google Workspace"),
    ("googlemail.com", "Google Workspace"),
    ("mail.protection.outlook.com", "Microsoft 365"),
    ("olc.protection.outlook.com", "Microsoft 365"),
    ("pphosted.com", "Proofpoint"),
    ("mimecast.com", "Mimecast"),
    ("messagelabs.com", "Symantec Email Security"),
    ("barracudanetworks.com", "Barracuda"),
    ("zoho.com", "Zoho Mail"),
    ("mx.yandex.net", "Yandex 360"),
    ("amazonaws.com", "Amazon SES / WorkMail"),
    ("secureserver.net", "GoDaddy"),
    ("emailsrvr.com", "Rackspace Email"),
    ("messagingengine.com", "Fastmail"),
    ("mail.icloud.com", "Apple iCloud Mail"),
    ("mailgun.org", "Mailgun"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxHost {
    pub priority: u16,
    pub exchange: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MxReport {
    pub found: bool,
    /// Hosts sorted ascending by priority.
    pub hosts: Vec<MxHost>,
    /// Domain published a null MX (RFC 7505): it does not accept mail.
    pub null_mx: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub issues: Vec<Issue>,
}

impl MechanismReport for MxReport {
    const MECHANISM: &'static str = "MX";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("MX check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

/// Provider name for an exchange host, by case-insensitive suffix match.
pub fn detect_provider(exchange: &str) -> Option<&'static str> {
    let host = exchange.to_ascii_lowercase();
    let host = host.trim_end_matches('.');
    PROVIDER_SIGNATURES
        .iter()
        .find(|(suffix, _)| host == *suffix || host.ends_with(&format!(".{suffix}")))
        .map(|(_, name)| *name)
}

pub struct MxChecker<R: DnsResolver> {
    resolver: R,
}

impl<R: DnsResolver> MxChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub async fn check(&self, domain: &str) -> Result<MxReport, CheckError> {
        let records = match self.resolver.query_mx(domain).await {
            Ok(records) => records,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        if records.is_empty() {
            debug!(domain, "no MX records");
            return Ok(MxReport {
                issues: vec![Issue::high("No MX records found").with_recommendation(
                    "Publish MX records, or a null MX (\". 0\") if the domain does not \
                     receive mail",
                )],
                ..MxReport::default()
            });
        }

        let mut hosts: Vec<MxHost> = records
            .into_iter()
            .map(|(priority, exchange)| MxHost {
                priority,
                exchange: exchange.to_ascii_lowercase(),
            })
            .collect();
        hosts.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.exchange.cmp(&b.exchange)));

        let null_mx = hosts
            .iter()
            .any(|h| h.exchange.is_empty() || h.exchange == ".");

        let mut issues = Vec::new();
        if null_mx {
            issues.push(Issue::info(
                "Null MX published (RFC 7505): the domain declares it does not accept mail",
            ));
        } else if hosts.len() == 1 {
            issues.push(
                Issue::low("Only one MX host; no redundancy if it goes down")
                    .with_recommendation("Add at least one backup MX host"),
            );
        } else if hosts.windows(2).all(|w| w[0].priority == w[1].priority) {
            issues.push(Issue::info(
                "All MX hosts share one priority (round-robin distribution)",
            ));
        }

        let provider = hosts.iter().find_map(|h| detect_provider(&h.exchange));
        if let Some(name) = provider {
            issues.push(Issue::info(format!("Mail hosted by {name}")));
        }

        Ok(MxReport {
            found: true,
            hosts,
            null_mx,
            provider: provider.map(str::to_string),
            issues,
        })
    }
}
