//! Aggregate result types shared by the orchestrator and the scoring engine.

use serde::ser::SerializeMap;
use serde::Serialize;

use crate::arc::ArcReport;
use crate::bimi::BimiReport;
use crate::common::issue::Issue;
use crate::dkim::DkimReport;
use crate::dmarc::DmarcReport;
use crate::dnssec::DnssecReport;
use crate::mta_sts::MtaStsReport;
use crate::mx::MxReport;
use crate::rdap::RdapReport;
use crate::spf::SpfReport;
use crate::tlsrpt::TlsRptReport;

/// Implemented by every per-mechanism report.
pub trait MechanismReport {
    /// Human name used in failure messages and the aggregate error field.
    const MECHANISM: &'static str;

    /// Synthetic report for a check that failed or timed out: not found,
    /// carrying a single high-severity issue naming the failure.
    fn failed(reason: &str) -> Self;

    fn issues(&self) -> &[Issue];
}

/// Outcome of one mechanism's check within a [`DomainResult`].
///
/// `Skipped` is a distinct variant rather than a flag so that skipped checks
/// cannot carry issues and cannot reach the scoring engine by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckReport<T> {
    /// The check was disabled by configuration; contributes nothing.
    Skipped,
    /// The check ran (successfully, unsuccessfully, or synthesized from a
    /// failure) and produced a report.
    Checked(T),
}

impl<T> CheckReport<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, CheckReport::Skipped)
    }

    pub fn as_checked(&self) -> Option<&T> {
        match self {
            CheckReport::Skipped => None,
            CheckReport::Checked(t) => Some(t),
        }
    }

    pub fn as_checked_mut(&mut self) -> Option<&mut T> {
        match self {
            CheckReport::Skipped => None,
            CheckReport::Checked(t) => Some(t),
        }
    }
}

impl<T: MechanismReport> CheckReport<T> {
    /// Issues attached to this check. Empty for skipped checks.
    pub fn issues(&self) -> &[Issue] {
        match self {
            CheckReport::Skipped => &[],
            CheckReport::Checked(t) => t.issues(),
        }
    }
}

impl<T: Serialize> Serialize for CheckReport<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CheckReport::Skipped => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("skipped", &true)?;
                map.serialize_entry("found", &false)?;
                map.end()
            }
            CheckReport::Checked(t) => t.serialize(serializer),
        }
    }
}

/// Letter grade derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::A,
            75..=89 => Grade::B,
            50..=74 => Grade::C,
            25..=49 => Grade::D,
            _ => Grade::F,
        }
    }
}

/// Complete assessment of one domain. Constructed once per analysis call and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DomainResult {
    /// Normalized domain (lowercase, no trailing dot, host-only).
    pub domain: String,
    pub grade: Grade,
    pub score: u8,
    /// RFC 3339 timestamp of when the analysis completed.
    pub checked_at: String,
    pub spf: CheckReport<SpfReport>,
    pub dkim: CheckReport<DkimReport>,
    pub dmarc: CheckReport<DmarcReport>,
    pub mx: CheckReport<MxReport>,
    pub bimi: CheckReport<BimiReport>,
    pub mta_sts: CheckReport<MtaStsReport>,
    pub tls_rpt: CheckReport<TlsRptReport>,
    pub arc: CheckReport<ArcReport>,
    pub dnssec: CheckReport<DnssecReport>,
    pub whois: CheckReport<RdapReport>,
    /// Remediation advice ordered by descending issue severity.
    pub recommendations: Vec<String>,
    /// Summary of mechanism checks that failed outright, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomainResult {
    /// Result for input that failed domain validation. No checks are run.
    pub fn invalid(domain: String, error: String) -> Self {
        Self {
            domain,
            grade: Grade::F,
            score: 0,
            checked_at: crate::analyzer::now_rfc3339(),
            spf: CheckReport::Skipped,
            dkim: CheckReport::Skipped,
            dmarc: CheckReport::Skipped,
            mx: CheckReport::Skipped,
            bimi: CheckReport::Skipped,
            mta_sts: CheckReport::Skipped,
            tls_rpt: CheckReport::Skipped,
            arc: CheckReport::Skipped,
            dnssec: CheckReport::Skipped,
            whois: CheckReport::Skipped,
            recommendations: Vec::new(),
            error: Some(error),
        }
    }
}
