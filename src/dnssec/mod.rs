//! DNSSEC chain assessment: DS and DNSKEY presence plus algorithm/digest
//! strength. Inspects only the queried domain's own records; it does not
//! build a chain of trust to the root.

mod algorithms;
mod dig;

pub use algorithms::{classify_algorithm, classify_digest, Strength};
pub use dig::{DigQuerier, DnssecRecordType, MockQuerier, QueryError, RecordQuerier};

use std::net::IpAddr;

use serde::Serialize;
use tracing::debug;

use crate::common::issue::Issue;
use crate::common::CheckError;
use crate::report::MechanismReport;

/// DNSKEY flag values distinguishing key roles (RFC 4034 section 2.1.1).
const FLAGS_KSK: u16 = 257;
const FLAGS_ZSK: u16 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnskeyRecord {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: String,
}

impl DnskeyRecord {
    pub fn is_ksk(&self) -> bool {
        self.flags == FLAGS_KSK
    }

    pub fn is_zsk(&self) -> bool {
        self.flags == FLAGS_ZSK
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DnssecReport {
    pub enabled: bool,
    pub ds_records: Vec<DsRecord>,
    pub dnskey_records: Vec<DnskeyRecord>,
    pub ksk_count: u32,
    pub zsk_count: u32,
    pub issues: Vec<Issue>,
}

impl MechanismReport for DnssecReport {
    const MECHANISM: &'static str = "DNSSEC";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("DNSSEC check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

/// Parse a `dig +short DS` line: `key_tag algorithm digest_type digest...`
/// (the hex digest may be split into several whitespace-separated chunks).
pub fn parse_ds_line(line: &str) -> Option<DsRecord> {
    let mut fields = line.split_whitespace();
    let key_tag = fields.next()?.parse().ok()?;
    let algorithm = fields.next()?.parse().ok()?;
    let digest_type = fields.next()?.parse().ok()?;
    let digest: String = fields.collect::<Vec<_>>().join("").to_uppercase();
    if digest.is_empty() {
        return None;
    }
    Some(DsRecord {
        key_tag,
        algorithm,
        digest_type,
        digest,
    })
}

/// Parse a `dig +short DNSKEY` line: `flags protocol algorithm key-base64...`.
pub fn parse_dnskey_line(line: &str) -> Option<DnskeyRecord> {
    let mut fields = line.split_whitespace();
    let flags = fields.next()?.parse().ok()?;
    let protocol = fields.next()?.parse().ok()?;
    let algorithm = fields.next()?.parse().ok()?;
    let public_key: String = fields.collect::<Vec<_>>().join("");
    if public_key.is_empty() {
        return None;
    }
    Some(DnskeyRecord {
        flags,
        protocol,
        algorithm,
        public_key,
    })
}

pub struct DnssecChecker<Q: RecordQuerier> {
    querier: Q,
}

impl<Q: RecordQuerier> DnssecChecker<Q> {
    pub fn new(querier: Q) -> Self {
        Self { querier }
    }

    pub async fn check(
        &self,
        domain: &str,
        resolver: Option<IpAddr>,
    ) -> Result<DnssecReport, CheckError> {
        let ds_lines = match self
            .querier
            .query(DnssecRecordType::Ds, domain, resolver)
            .await
        {
            Ok(lines) => lines,
            Err(QueryError::ToolMissing(tool)) => return Ok(tool_missing_report(&tool)),
            Err(QueryError::Failed(reason)) => return Err(CheckError::Tool(reason)),
        };

        let dnskey_lines = match self
            .querier
            .query(DnssecRecordType::Dnskey, domain, resolver)
            .await
        {
            Ok(lines) => lines,
            Err(QueryError::ToolMissing(tool)) => return Ok(tool_missing_report(&tool)),
            Err(QueryError::Failed(reason)) => return Err(CheckError::Tool(reason)),
        };

        let ds_records: Vec<DsRecord> = ds_lines.iter().filter_map(|l| parse_ds_line(l)).collect();
        let dnskey_records: Vec<DnskeyRecord> = dnskey_lines
            .iter()
            .filter_map(|l| parse_dnskey_line(l))
            .collect();

        let ksk_count = dnskey_records.iter().filter(|k| k.is_ksk()).count() as u32;
        let zsk_count = dnskey_records.iter().filter(|k| k.is_zsk()).count() as u32;
        let enabled = !ds_records.is_empty() && !dnskey_records.is_empty();

        debug!(
            domain,
            ds = ds_records.len(),
            dnskey = dnskey_records.len(),
            enabled,
            "DNSSEC chain inspected"
        );

        let mut issues = Vec::new();
        if !enabled {
            if ds_records.is_empty() && dnskey_records.is_empty() {
                issues.push(
                    Issue::info("DNSSEC is not enabled for this domain").with_recommendation(
                        "Consider enabling DNSSEC to protect DNS answers against tampering",
                    ),
                );
            } else if dnskey_records.is_empty() {
                issues.push(
                    Issue::high(
                        "DS records are published in the parent zone but the domain serves \
                         no DNSKEY records; validating resolvers will fail lookups",
                    )
                    .with_recommendation(
                        "Publish matching DNSKEY records or remove the DS records",
                    ),
                );
            } else {
                issues.push(
                    Issue::low(
                        "DNSKEY records exist but no DS record is published in the parent \
                         zone; the chain of trust is not established",
                    )
                    .with_recommendation("Publish a DS record through your registrar"),
                );
            }
        }

        for ds in &ds_records {
            match classify_algorithm(ds.algorithm) {
                Some((name, Strength::Deprecated)) => issues.push(
                    Issue::high(format!(
                        "DS record (key tag {}) uses deprecated algorithm {name} ({})",
                        ds.key_tag, ds.algorithm
                    ))
                    .with_recommendation("Re-sign the zone with a modern algorithm such as ECDSA P-256 or Ed25519"),
                ),
                Some((name, Strength::Weak)) => issues.push(
                    Issue::medium(format!(
                        "DS record (key tag {}) uses weak algorithm {name} ({})",
                        ds.key_tag, ds.algorithm
                    ))
                    .with_recommendation("Migrate to algorithm 13 (ECDSA P-256) or 15 (Ed25519)"),
                ),
                Some(_) => {}
                None => issues.push(Issue::info(format!(
                    "DS record (key tag {}) uses unrecognized algorithm {}",
                    ds.key_tag, ds.algorithm
                ))),
            }
            match classify_digest(ds.digest_type) {
                Some((name, Strength::Deprecated)) => issues.push(Issue::high(format!(
                    "DS record (key tag {}) uses deprecated digest {name} ({})",
                    ds.key_tag, ds.digest_type
                ))),
                Some((name, Strength::Weak)) => issues.push(
                    Issue::medium(format!(
                        "DS record (key tag {}) uses weak digest {name} ({})",
                        ds.key_tag, ds.digest_type
                    ))
                    .with_recommendation("Publish a DS record with a SHA-256 digest"),
                ),
                Some(_) => {}
                None => issues.push(Issue::info(format!(
                    "DS record (key tag {}) uses unrecognized digest type {}",
                    ds.key_tag, ds.digest_type
                ))),
            }
        }

        for key in &dnskey_records {
            match classify_algorithm(key.algorithm) {
                Some((name, Strength::Deprecated)) => issues.push(
                    Issue::high(format!(
                        "DNSKEY (flags {}) uses deprecated algorithm {name} ({})",
                        key.flags, key.algorithm
                    ))
                    .with_recommendation("Re-sign the zone with a modern algorithm such as ECDSA P-256 or Ed25519"),
                ),
                Some((name, Strength::Weak)) => issues.push(
                    Issue::medium(format!(
                        "DNSKEY (flags {}) uses weak algorithm {name} ({})",
                        key.flags, key.algorithm
                    ))
                    .with_recommendation("Migrate to algorithm 13 (ECDSA P-256) or 15 (Ed25519)"),
                ),
                Some(_) => {}
                None => issues.push(Issue::info(format!(
                    "DNSKEY (flags {}) uses unrecognized algorithm {}",
                    key.flags, key.algorithm
                ))),
            }
        }

        if enabled && ksk_count == 0 {
            issues.push(Issue::medium(
                "No key-signing key (flags 257) among the DNSKEY records",
            ));
        }

        Ok(DnssecReport {
            enabled,
            ds_records,
            dnskey_records,
            ksk_count,
            zsk_count,
            issues,
        })
    }
}

fn tool_missing_report(tool: &str) -> DnssecReport {
    DnssecReport {
        issues: vec![Issue::high(format!(
            "DNSSEC check requires the '{tool}' tool, which is not installed"
        ))
        .with_recommendation(format!("Install '{tool}' to enable DNSSEC checks"))],
        ..DnssecReport::default()
    }
}
