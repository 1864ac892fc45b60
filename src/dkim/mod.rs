//! DKIM key record assessment (RFC 6376). Probes a list of candidate
//! selectors and grades the published key material; does not verify
//! signatures.

mod key;
mod selectors;

pub use key::{estimate_rsa_bits, DkimKey, KeyType};
pub use selectors::DEFAULT_SELECTORS;

use serde::Serialize;
use tracing::debug;

use crate::common::dns::DnsResolver;
use crate::common::issue::Issue;
use crate::common::CheckError;
use crate::report::MechanismReport;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DkimSelector {
    pub selector: String,
    #[serde(flatten)]
    pub key: DkimKey,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DkimReport {
    pub found: bool,
    pub selectors: Vec<DkimSelector>,
    pub issues: Vec<Issue>,
}

impl DkimReport {
    /// Smallest RSA key size among usable (non-revoked, decodable) selectors.
    /// Ed25519 keys are treated as at least 2048-bit-equivalent.
    pub fn weakest_key_bits(&self) -> Option<u32> {
        self.selectors
            .iter()
            .filter(|s| !s.key.revoked)
            .filter_map(|s| match s.key.key_type {
                KeyType::Ed25519 => Some(2048),
                KeyType::Rsa => s.key.key_bits,
            })
            .min()
    }
}

impl MechanismReport for DkimReport {
    const MECHANISM: &'static str = "DKIM";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("DKIM check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

pub struct DkimChecker<R: DnsResolver> {
    resolver: R,
}

impl<R: DnsResolver> DkimChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Probe each candidate selector at `<selector>._domainkey.<domain>`.
    /// A selector that does not resolve is not an error; any transport
    /// failure fails the whole check.
    pub async fn check(&self, domain: &str, candidates: &[String]) -> Result<DkimReport, CheckError> {
        let mut found_selectors = Vec::new();

        for selector in candidates {
            let name = format!("{selector}._domainkey.{domain}");
            let records = match self.resolver.query_txt(&name).await {
                Ok(records) => records,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e.into()),
            };

            // TXT records are split into 255-byte strings; a key record may
            // come back as multiple chunks of one logical record.
            let joined = records.join("");
            let candidate = if DkimKey::parse(&joined).is_some() {
                Some(joined)
            } else {
                records.iter().find(|r| DkimKey::parse(r).is_some()).cloned()
            };

            if let Some(record) = candidate {
                if let Some(key) = DkimKey::parse(&record) {
                    debug!(domain, selector, "DKIM selector found");
                    found_selectors.push(DkimSelector {
                        selector: selector.clone(),
                        key,
                    });
                }
            }
        }

        if found_selectors.is_empty() {
            return Ok(DkimReport {
                issues: vec![Issue::high(format!(
                    "No DKIM selectors found among {} candidates",
                    candidates.len()
                ))
                .with_recommendation(
                    "Publish a DKIM key and sign outbound mail; if one exists under a \
                     custom selector, pass it explicitly",
                )],
                ..DkimReport::default()
            });
        }

        let mut issues = Vec::new();
        for sel in &found_selectors {
            if sel.key.revoked {
                issues.push(Issue::medium(format!(
                    "DKIM key for selector '{}' is revoked (empty p=)",
                    sel.selector
                )));
                continue;
            }
            if sel.key.key_type == KeyType::Rsa {
                match sel.key.key_bits {
                    Some(bits) if bits < 1024 => {
                        issues.push(
                            Issue::high(format!(
                                "DKIM selector '{}' uses a {}-bit RSA key; keys under \
                                 1024 bits are trivially forgeable",
                                sel.selector, bits
                            ))
                            .with_recommendation(
                                "Rotate to an RSA key of at least 2048 bits",
                            ),
                        );
                    }
                    Some(bits) if bits < 2048 => {
                        issues.push(
                            Issue::medium(format!(
                                "DKIM selector '{}' uses a {}-bit RSA key",
                                sel.selector, bits
                            ))
                            .with_recommendation(
                                "Rotate to an RSA key of at least 2048 bits",
                            ),
                        );
                    }
                    _ => {}
                }
            }
        }

        Ok(DkimReport {
            found: true,
            selectors: found_selectors,
            issues,
        })
    }
}
