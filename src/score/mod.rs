//! Scoring engine: folds the per-mechanism reports into a 0-100 score, a
//! letter grade, and an ordered recommendation list.
//!
//! Four core mechanisms carry weights (SPF 30, DKIM 25, DMARC 35, MX 10).
//! When a core check is skipped its weight is removed and the remaining
//! points are renormalized to 100, so a skipped check neither rewards nor
//! punishes. Auxiliary mechanisms add small bonuses on top.

use crate::common::issue::Issue;
use crate::dmarc::DmarcPolicy;
use crate::report::{CheckReport, DomainResult, Grade, MechanismReport};
use crate::spf::AllQualifier;

const SPF_WEIGHT: u32 = 30;
const DKIM_WEIGHT: u32 = 25;
const DMARC_WEIGHT: u32 = 35;
const MX_WEIGHT: u32 = 10;

/// Compute the numeric score and grade for a set of settled reports. The
/// `score`, `grade`, and `recommendations` fields of the input are ignored.
pub fn evaluate(result: &DomainResult) -> (u8, Grade) {
    let mut points: u32 = 0;
    let mut weight_sum: u32 = 0;

    if let Some(spf) = result.spf.as_checked() {
        points += spf_points(spf);
        weight_sum += SPF_WEIGHT;
    }
    if let Some(dkim) = result.dkim.as_checked() {
        points += dkim_points(dkim);
        weight_sum += DKIM_WEIGHT;
    }
    if let Some(dmarc) = result.dmarc.as_checked() {
        points += dmarc_points(dmarc);
        weight_sum += DMARC_WEIGHT;
    }
    if let Some(mx) = result.mx.as_checked() {
        points += mx_points(mx);
        weight_sum += MX_WEIGHT;
    }

    let mut score = if weight_sum == 0 {
        0
    } else {
        (points * 100 + weight_sum / 2) / weight_sum
    };

    score += bonus_points(result);
    let score = score.min(100) as u8;
    (score, Grade::from_score(score))
}

/// Out of 30. Presence earns a base, the `all` qualifier carries most of the
/// weight, and lookup-limit or ptr problems subtract.
fn spf_points(spf: &crate::spf::SpfReport) -> u32 {
    if !spf.found {
        return 0;
    }
    let mut points: i32 = 10;
    points += match spf.all_qualifier {
        Some(AllQualifier::Fail) => 20,
        Some(AllQualifier::SoftFail) => 14,
        Some(AllQualifier::Neutral) => 6,
        None => 2,
        Some(AllQualifier::Pass) => 0,
    };
    if spf.lookup_count > 10 {
        points -= 8;
    } else if spf.lookup_count >= 8 {
        points -= 4;
    }
    if spf.has_ptr {
        points -= 2;
    }
    points.max(0) as u32
}

/// Out of 25: 15 for any usable key, the rest for key strength.
fn dkim_points(dkim: &crate::dkim::DkimReport) -> u32 {
    if !dkim.found {
        return 0;
    }
    let mut points = 15;
    points += match dkim.weakest_key_bits() {
        Some(bits) if bits >= 2048 => 10,
        Some(bits) if bits >= 1024 => 4,
        _ => 0,
    };
    points
}

/// Out of 35. Policy strictness dominates; aggregate reporting and full
/// coverage round it out.
fn dmarc_points(dmarc: &crate::dmarc::DmarcReport) -> u32 {
    if !dmarc.found {
        return 0;
    }
    let mut points = 5;
    points += match dmarc.policy {
        Some(DmarcPolicy::Reject) => 15,
        Some(DmarcPolicy::Quarantine) => 10,
        Some(DmarcPolicy::None) => 3,
        None => 0,
    };
    if dmarc.reporting_enabled {
        points += 10;
    }
    points += if dmarc.percent == 100 { 5 } else { 2 };
    points
}

/// Out of 10: mail is deliverable, with redundancy worth extra.
fn mx_points(mx: &crate::mx::MxReport) -> u32 {
    if !mx.found || mx.null_mx {
        return 0;
    }
    let mut points = 6;
    if mx.hosts.len() >= 2 {
        points += 4;
    }
    points
}

/// Auxiliary mechanisms are worth a flat bonus each when configured.
fn bonus_points(result: &DomainResult) -> u32 {
    let mut bonus = 0;
    if result
        .dnssec
        .as_checked()
        .is_some_and(|d| d.enabled)
    {
        bonus += 3;
    }
    if result.mta_sts.as_checked().is_some_and(|m| m.found) {
        bonus += 3;
    }
    if result.tls_rpt.as_checked().is_some_and(|t| t.found) {
        bonus += 2;
    }
    if result.bimi.as_checked().is_some_and(|b| b.found) {
        bonus += 1;
    }
    if result.arc.as_checked().is_some_and(|a| a.ready) {
        bonus += 1;
    }
    bonus
}

/// Remediation advice across all non-skipped checks, ordered by descending
/// issue severity and deduplicated by text.
pub fn recommendations(result: &DomainResult) -> Vec<String> {
    let mut issues: Vec<&Issue> = Vec::new();
    collect(&result.spf, &mut issues);
    collect(&result.dkim, &mut issues);
    collect(&result.dmarc, &mut issues);
    collect(&result.mx, &mut issues);
    collect(&result.bimi, &mut issues);
    collect(&result.mta_sts, &mut issues);
    collect(&result.tls_rpt, &mut issues);
    collect(&result.arc, &mut issues);
    collect(&result.dnssec, &mut issues);
    collect(&result.whois, &mut issues);

    issues.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut out: Vec<String> = Vec::new();
    for issue in issues {
        if let Some(rec) = &issue.recommendation {
            if !out.iter().any(|r| r == rec) {
                out.push(rec.clone());
            }
        }
    }
    out
}

fn collect<'a, T: MechanismReport>(report: &'a CheckReport<T>, into: &mut Vec<&'a Issue>) {
    into.extend(report.issues());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::issue::Issue;
    use crate::dkim::{DkimKey, DkimReport, DkimSelector, KeyType};
    use crate::dmarc::DmarcReport;
    use crate::mx::{MxHost, MxReport};
    use crate::spf::SpfReport;

    fn rsa_selector(name: &str, bits: u32) -> DkimSelector {
        DkimSelector {
            selector: name.to_string(),
            key: DkimKey {
                key_type: KeyType::Rsa,
                revoked: false,
                key_bits: Some(bits),
            },
        }
    }

    fn empty_result() -> DomainResult {
        DomainResult::invalid("example.com".into(), String::new())
    }

    fn strong_spf() -> SpfReport {
        SpfReport {
            found: true,
            record: Some("v=spf1 include:_spf.example.net -all".into()),
            all_qualifier: Some(AllQualifier::Fail),
            lookup_count: 1,
            ..SpfReport::default()
        }
    }

    fn strong_dkim() -> DkimReport {
        DkimReport {
            found: true,
            selectors: vec![rsa_selector("s1", 2048)],
            issues: Vec::new(),
        }
    }

    fn strong_dmarc() -> DmarcReport {
        DmarcReport {
            found: true,
            policy: Some(DmarcPolicy::Reject),
            rua: vec!["mailto:dmarc@example.com".into()],
            reporting_enabled: true,
            percent: 100,
            ..DmarcReport::default()
        }
    }

    fn strong_mx() -> MxReport {
        MxReport {
            found: true,
            hosts: vec![
                MxHost {
                    priority: 1,
                    exchange: "aspmx.l.google.com".into(),
                },
                MxHost {
                    priority: 5,
                    exchange: "alt1.aspmx.l.google.com".into(),
                },
            ],
            ..MxReport::default()
        }
    }

    #[test]
    fn nothing_found_scores_zero() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(SpfReport::default());
        result.dkim = CheckReport::Checked(DkimReport::default());
        result.dmarc = CheckReport::Checked(DmarcReport::default());
        result.mx = CheckReport::Checked(MxReport::default());
        let (score, grade) = evaluate(&result);
        assert_eq!(score, 0);
        assert_eq!(grade, Grade::F);
    }

    #[test]
    fn fully_configured_scores_a() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(strong_spf());
        result.dkim = CheckReport::Checked(strong_dkim());
        result.dmarc = CheckReport::Checked(strong_dmarc());
        result.mx = CheckReport::Checked(strong_mx());
        let (score, grade) = evaluate(&result);
        assert!(score >= 90, "score was {score}");
        assert_eq!(grade, Grade::A);
    }

    #[test]
    fn spf_only_with_hard_fail_is_d() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(strong_spf());
        result.dkim = CheckReport::Checked(DkimReport::default());
        result.dmarc = CheckReport::Checked(DmarcReport::default());
        result.mx = CheckReport::Checked(MxReport::default());
        let (score, grade) = evaluate(&result);
        assert_eq!(score, 30);
        assert_eq!(grade, Grade::D);
    }

    #[test]
    fn skipped_core_check_renormalizes() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(strong_spf());
        result.dmarc = CheckReport::Checked(strong_dmarc());
        result.mx = CheckReport::Checked(strong_mx());
        // DKIM skipped: the other three are perfect, so the score is full.
        let (score, grade) = evaluate(&result);
        assert_eq!(score, 100);
        assert_eq!(grade, Grade::A);
    }

    #[test]
    fn all_core_checks_skipped_scores_zero() {
        let (score, grade) = evaluate(&empty_result());
        assert_eq!(score, 0);
        assert_eq!(grade, Grade::F);
    }

    #[test]
    fn excess_lookups_lower_the_score() {
        let mut over = strong_spf();
        over.lookup_count = 15;
        let mut under = strong_spf();
        under.lookup_count = 5;
        assert!(spf_points(&over) < spf_points(&under));
    }

    #[test]
    fn softfail_scores_below_hard_fail() {
        let mut soft = strong_spf();
        soft.all_qualifier = Some(AllQualifier::SoftFail);
        assert!(spf_points(&soft) < spf_points(&strong_spf()));
    }

    #[test]
    fn plus_all_scores_below_missing_all() {
        let mut plus = strong_spf();
        plus.all_qualifier = Some(AllQualifier::Pass);
        let mut missing = strong_spf();
        missing.all_qualifier = None;
        assert!(spf_points(&plus) < spf_points(&missing));
    }

    #[test]
    fn weak_dkim_key_scores_below_strong() {
        let strong = strong_dkim();
        let weak = DkimReport {
            found: true,
            selectors: vec![rsa_selector("s1", 1024)],
            issues: Vec::new(),
        };
        assert!(dkim_points(&weak) < dkim_points(&strong));
    }

    #[test]
    fn dmarc_policy_ladder() {
        let reject = strong_dmarc();
        let mut quarantine = strong_dmarc();
        quarantine.policy = Some(DmarcPolicy::Quarantine);
        let mut none = strong_dmarc();
        none.policy = Some(DmarcPolicy::None);
        assert!(dmarc_points(&none) < dmarc_points(&quarantine));
        assert!(dmarc_points(&quarantine) < dmarc_points(&reject));
    }

    #[test]
    fn null_mx_earns_nothing() {
        let report = MxReport {
            found: true,
            null_mx: true,
            ..MxReport::default()
        };
        assert_eq!(mx_points(&report), 0);
    }

    #[test]
    fn single_mx_host_scores_below_redundant() {
        let mut single = strong_mx();
        single.hosts.truncate(1);
        assert!(mx_points(&single) < mx_points(&strong_mx()));
    }

    #[test]
    fn bonuses_cap_at_one_hundred() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(strong_spf());
        result.dkim = CheckReport::Checked(strong_dkim());
        result.dmarc = CheckReport::Checked(strong_dmarc());
        result.mx = CheckReport::Checked(strong_mx());
        result.dnssec = CheckReport::Checked(crate::dnssec::DnssecReport {
            enabled: true,
            ..crate::dnssec::DnssecReport::default()
        });
        result.mta_sts = CheckReport::Checked(crate::mta_sts::MtaStsReport {
            found: true,
            ..crate::mta_sts::MtaStsReport::default()
        });
        result.tls_rpt = CheckReport::Checked(crate::tlsrpt::TlsRptReport {
            found: true,
            ..crate::tlsrpt::TlsRptReport::default()
        });
        result.bimi = CheckReport::Checked(crate::bimi::BimiReport {
            found: true,
            ..crate::bimi::BimiReport::default()
        });
        result.arc = CheckReport::Checked(crate::arc::derive_readiness(true, true, true));
        let (score, _) = evaluate(&result);
        assert_eq!(score, 100);
    }

    #[test]
    fn recommendations_ordered_by_severity() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(SpfReport {
            found: true,
            issues: vec![Issue::low("soft").with_recommendation("low fix")],
            ..SpfReport::default()
        });
        result.dmarc = CheckReport::Checked(DmarcReport {
            issues: vec![Issue::critical("missing").with_recommendation("critical fix")],
            ..DmarcReport::default()
        });
        let recs = recommendations(&result);
        assert_eq!(recs, vec!["critical fix", "low fix"]);
    }

    #[test]
    fn recommendations_deduplicated() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(SpfReport {
            issues: vec![
                Issue::high("a").with_recommendation("same fix"),
                Issue::medium("b").with_recommendation("same fix"),
            ],
            ..SpfReport::default()
        });
        let recs = recommendations(&result);
        assert_eq!(recs, vec!["same fix"]);
    }

    #[test]
    fn issues_without_recommendations_are_dropped() {
        let mut result = empty_result();
        result.spf = CheckReport::Checked(SpfReport {
            issues: vec![Issue::info("informational only")],
            ..SpfReport::default()
        });
        assert!(recommendations(&result).is_empty());
    }
}
