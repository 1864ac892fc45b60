//! Registration data lookup via RDAP (the structured successor to WHOIS).
//! Resolves the TLD to an authoritative RDAP base URL through the IANA
//! bootstrap document, then queries `<base>/domain/<name>`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::common::domain::tld;
use crate::common::http::{HttpError, HttpFetcher};
use crate::common::issue::Issue;
use crate::common::CheckError;
use crate::report::MechanismReport;

const BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RdapReport {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,
    /// RFC 3339 expiration date from the registry's event list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    pub statuses: Vec<String>,
    pub issues: Vec<Issue>,
}

impl MechanismReport for RdapReport {
    const MECHANISM: &'static str = "WHOIS";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("WHOIS check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

pub struct RdapChecker<H: HttpFetcher> {
    http: H,
}

impl<H: HttpFetcher> RdapChecker<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub async fn check(&self, domain: &str, timeout: Duration) -> Result<RdapReport, CheckError> {
        let bootstrap = self.http.fetch_text(BOOTSTRAP_URL, timeout).await?;
        let Some(base) = find_service_url(&bootstrap, tld(domain)) else {
            debug!(domain, "no RDAP coverage for TLD");
            return Ok(RdapReport {
                issues: vec![Issue::info(format!(
                    "No RDAP service covers the .{} TLD; registration data unavailable",
                    tld(domain)
                ))],
                ..RdapReport::default()
            });
        };

        let url = format!("{}domain/{}", base, domain);
        let body = match self.http.fetch_text(&url, timeout).await {
            Ok(body) => body,
            Err(HttpError::NotFound) => {
                return Ok(RdapReport {
                    issues: vec![Issue::low(
                        "Domain not found in the registry's RDAP service; it may be \
                         unregistered or its data unpublished",
                    )],
                    ..RdapReport::default()
                });
            }
            Err(e) => return Err(e.into()),
        };

        let Ok(doc) = serde_json::from_str::<Value>(&body) else {
            return Err(CheckError::Tool("RDAP response is not valid JSON".into()));
        };

        let registrar = extract_registrar(&doc);
        let expires = extract_event_date(&doc, "expiration");
        let statuses: Vec<String> = doc["status"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut issues = Vec::new();
        if let Some(date) = expires.as_deref().and_then(parse_rdap_date) {
            let days_left = (date - Utc::now()).num_days();
            if days_left < 0 {
                issues.push(
                    Issue::high("Domain registration has expired")
                        .with_recommendation("Renew the domain registration immediately"),
                );
            } else if days_left <= 30 {
                issues.push(
                    Issue::high(format!(
                        "Domain registration expires in {days_left} days"
                    ))
                    .with_recommendation("Renew the domain registration and enable auto-renew"),
                );
            } else if days_left <= 90 {
                issues.push(
                    Issue::medium(format!(
                        "Domain registration expires in {days_left} days"
                    ))
                    .with_recommendation("Renew the domain registration or enable auto-renew"),
                );
            }
        }

        Ok(RdapReport {
            found: true,
            registrar,
            expires,
            statuses,
            issues,
        })
    }
}

/// Find the RDAP base URL for a TLD in the IANA bootstrap document. Entries
/// are `[[tld, ...], [url, ...]]` pairs under `services`.
fn find_service_url(bootstrap: &str, tld: &str) -> Option<String> {
    let doc: Value = serde_json::from_str(bootstrap).ok()?;
    for service in doc["services"].as_array()? {
        let tlds = service.get(0)?.as_array()?;
        let covered = tlds
            .iter()
            .filter_map(|v| v.as_str())
            .any(|t| t.eq_ignore_ascii_case(tld));
        if covered {
            let url = service.get(1)?.as_array()?.first()?.as_str()?;
            let mut base = url.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            return Some(base);
        }
    }
    None
}

/// Registrar name: the `fn` entry of the vCard of the entity with the
/// `registrar` role.
fn extract_registrar(doc: &Value) -> Option<String> {
    for entity in doc["entities"].as_array()? {
        let is_registrar = entity["roles"]
            .as_array()
            .is_some_and(|roles| roles.iter().any(|r| r.as_str() == Some("registrar")));
        if !is_registrar {
            continue;
        }
        let vcard = entity["vcardArray"].get(1)?.as_array()?;
        for entry in vcard {
            let entry = entry.as_array()?;
            if entry.first()?.as_str()? == "fn" {
                return entry.get(3)?.as_str().map(str::to_string);
            }
        }
    }
    None
}

fn extract_event_date(doc: &Value, action: &str) -> Option<String> {
    for event in doc["events"].as_array()? {
        if event["eventAction"].as_str() == Some(action) {
            return event["eventDate"].as_str().map(str::to_string);
        }
    }
    None
}

fn parse_rdap_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
