//! ARC readiness (RFC 8617), derived from the settled SPF, DKIM, and DMARC
//! results. Performs no I/O of its own.

use serde::Serialize;

use crate::common::issue::Issue;
use crate::report::MechanismReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArcReport {
    /// The domain has the prerequisites to participate in ARC chains.
    pub ready: bool,
    /// A DKIM key exists, so the domain could add ARC seals.
    pub can_sign: bool,
    /// SPF or DKIM exists, so the domain's mail can be evaluated at each hop.
    pub can_validate: bool,
    pub issues: Vec<Issue>,
}

impl MechanismReport for ArcReport {
    const MECHANISM: &'static str = "ARC";

    fn failed(reason: &str) -> Self {
        Self {
            issues: vec![Issue::high(format!("ARC check failed: {reason}"))],
            ..Self::default()
        }
    }

    fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

/// Derive ARC readiness from the presence of the underlying mechanisms.
/// Readiness requires SPF or DKIM plus a DMARC record, since ARC exists to
/// preserve authentication results that DMARC would otherwise discard after
/// forwarding.
pub fn derive_readiness(spf_found: bool, dkim_found: bool, dmarc_found: bool) -> ArcReport {
    let can_sign = dkim_found;
    let can_validate = spf_found || dkim_found;
    let ready = can_validate && dmarc_found;

    let mut issues = Vec::new();
    if !ready {
        let missing = if !can_validate {
            "neither SPF nor DKIM is configured"
        } else {
            "no DMARC record is published"
        };
        issues.push(
            Issue::medium(format!("Domain is not ARC-ready: {missing}")).with_recommendation(
                "Configure SPF or DKIM plus DMARC so intermediaries can preserve \
                 authentication results across forwarding",
            ),
        );
    } else if !can_sign {
        issues.push(
            Issue::low("Domain can validate ARC chains but cannot seal them (no DKIM key)")
                .with_recommendation("Publish a DKIM key to allow ARC sealing"),
        );
    }

    ArcReport {
        ready,
        can_sign,
        can_validate,
        issues,
    }
}
