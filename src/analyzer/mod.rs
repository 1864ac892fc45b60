//! Orchestrator: normalizes the input, fans the enabled checks out
//! concurrently, derives the cross-mechanism results, and folds everything
//! into a scored [`DomainResult`].

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::arc;
use crate::bimi::BimiChecker;
use crate::common::dns::{DnsResolver, HickoryResolver};
use crate::common::domain;
use crate::common::http::{HttpFetcher, ReqwestFetcher};
use crate::common::issue::Issue;
use crate::common::CheckError;
use crate::dkim::{DkimChecker, DEFAULT_SELECTORS};
use crate::dmarc::DmarcChecker;
use crate::dnssec::{DigQuerier, DnssecChecker, RecordQuerier};
use crate::mta_sts::{pattern_matches, MtaStsChecker};
use crate::mx::MxChecker;
use crate::rdap::RdapChecker;
use crate::report::{CheckReport, DomainResult, Grade, MechanismReport};
use crate::score;
use crate::spf::SpfChecker;
use crate::tlsrpt::TlsRptChecker;

/// Current time as an RFC 3339 timestamp, second precision, UTC.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Which checks to run. Disabled checks produce [`CheckReport::Skipped`] and
/// contribute nothing to the score or recommendations.
#[derive(Debug, Clone, Copy)]
pub struct CheckToggles {
    pub spf: bool,
    pub dkim: bool,
    pub dmarc: bool,
    pub mx: bool,
    pub bimi: bool,
    pub mta_sts: bool,
    pub tls_rpt: bool,
    pub arc: bool,
    pub dnssec: bool,
    pub whois: bool,
}

impl Default for CheckToggles {
    fn default() -> Self {
        Self {
            spf: true,
            dkim: true,
            dmarc: true,
            mx: true,
            bimi: true,
            mta_sts: true,
            tls_rpt: true,
            arc: true,
            dnssec: true,
            whois: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub checks: CheckToggles,
    /// DKIM selectors to probe.
    pub dkim_selectors: Vec<String>,
    /// Per-check deadline; a check that exceeds it is reported as failed.
    pub check_timeout: Duration,
    /// Nameserver handed to the external DNSSEC tool. `None` uses the
    /// system default.
    pub resolver: Option<IpAddr>,
    /// Number of domains analyzed concurrently by [`Analyzer::analyze_many`].
    pub batch_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            checks: CheckToggles::default(),
            dkim_selectors: DEFAULT_SELECTORS.iter().map(|s| s.to_string()).collect(),
            check_timeout: Duration::from_secs(10),
            resolver: None,
            batch_size: 5,
        }
    }
}

pub struct Analyzer<R: DnsResolver, H: HttpFetcher, Q: RecordQuerier> {
    config: AnalyzerConfig,
    resolver: R,
    http: H,
    querier: Q,
}

impl Analyzer<HickoryResolver, ReqwestFetcher, DigQuerier> {
    /// Analyzer backed by the system resolver, a reqwest client, and the
    /// external `dig` tool.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_collaborators(
            config,
            HickoryResolver::new(),
            ReqwestFetcher::new(),
            DigQuerier::new(),
        )
    }
}

impl Default for Analyzer<HickoryResolver, ReqwestFetcher, DigQuerier> {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl<R: DnsResolver, H: HttpFetcher, Q: RecordQuerier> Analyzer<R, H, Q> {
    pub fn with_collaborators(config: AnalyzerConfig, resolver: R, http: H, querier: Q) -> Self {
        Self {
            config,
            resolver,
            http,
            querier,
        }
    }

    /// Run all enabled checks against one domain. Infallible: transport
    /// failures and timeouts degrade the affected check and surface in the
    /// result's `error` field instead of aborting the analysis.
    pub async fn analyze_domain(&self, input: &str) -> DomainResult {
        let domain = domain::normalize(input);
        if !domain::is_valid(&domain) {
            warn!(input, "rejected invalid domain");
            return DomainResult::invalid(domain, "Invalid domain name".to_string());
        }
        debug!(domain = %domain, "starting analysis");

        let toggles = &self.config.checks;
        let timeout = self.config.check_timeout;

        let spf_checker = SpfChecker::new(self.resolver.clone());
        let dkim_checker = DkimChecker::new(self.resolver.clone());
        let dmarc_checker = DmarcChecker::new(self.resolver.clone());
        let mx_checker = MxChecker::new(self.resolver.clone());
        let bimi_checker = BimiChecker::new(self.resolver.clone());
        let sts_checker = MtaStsChecker::new(self.resolver.clone(), self.http.clone());
        let tlsrpt_checker = TlsRptChecker::new(self.resolver.clone());
        let dnssec_checker = DnssecChecker::new(self.querier.clone());
        let rdap_checker = RdapChecker::new(self.http.clone());

        let (
            (spf, spf_err),
            (dkim, dkim_err),
            (dmarc, dmarc_err),
            (mx, mx_err),
            (bimi, bimi_err),
            (mta_sts, sts_err),
            (tls_rpt, tlsrpt_err),
            (dnssec, dnssec_err),
            (whois, whois_err),
        ) = tokio::join!(
            run_check(toggles.spf, timeout, spf_checker.check(&domain)),
            run_check(
                toggles.dkim,
                timeout,
                dkim_checker.check(&domain, &self.config.dkim_selectors),
            ),
            run_check(toggles.dmarc, timeout, dmarc_checker.check(&domain)),
            run_check(toggles.mx, timeout, mx_checker.check(&domain)),
            run_check(toggles.bimi, timeout, bimi_checker.check(&domain)),
            run_check(toggles.mta_sts, timeout, sts_checker.check(&domain, timeout)),
            run_check(toggles.tls_rpt, timeout, tlsrpt_checker.check(&domain)),
            run_check(
                toggles.dnssec,
                timeout,
                dnssec_checker.check(&domain, self.config.resolver),
            ),
            run_check(toggles.whois, timeout, rdap_checker.check(&domain, timeout)),
        );

        // ARC readiness is derived from the settled prerequisites, so it is
        // only meaningful when all of them actually ran.
        let arc = if toggles.arc && toggles.spf && toggles.dkim && toggles.dmarc {
            let spf_found = spf.as_checked().is_some_and(|r| r.found);
            let dkim_found = dkim.as_checked().is_some_and(|r| r.found);
            let dmarc_found = dmarc.as_checked().is_some_and(|r| r.found);
            CheckReport::Checked(arc::derive_readiness(spf_found, dkim_found, dmarc_found))
        } else {
            CheckReport::Skipped
        };

        let error = [
            spf_err, dkim_err, dmarc_err, mx_err, bimi_err, sts_err, tlsrpt_err, dnssec_err,
            whois_err,
        ]
        .into_iter()
        .flatten()
        .reduce(|acc, e| format!("{acc}; {e}"));

        let mut result = DomainResult {
            domain,
            grade: Grade::F,
            score: 0,
            checked_at: now_rfc3339(),
            spf,
            dkim,
            dmarc,
            mx,
            bimi,
            mta_sts,
            tls_rpt,
            arc,
            dnssec,
            whois,
            recommendations: Vec::new(),
            error,
        };

        cross_validate(&mut result);

        let (score, grade) = score::evaluate(&result);
        result.score = score;
        result.grade = grade;
        result.recommendations = score::recommendations(&result);
        debug!(domain = %result.domain, score, ?grade, "analysis complete");
        result
    }

    /// Analyze domains in windows of `batch_size`, preserving input order.
    /// The resolver cache is cleared between windows so one window's answers
    /// never leak into the next.
    pub async fn analyze_many(&self, domains: &[String]) -> Vec<DomainResult> {
        let batch_size = self.config.batch_size.max(1);
        let mut results = Vec::with_capacity(domains.len());
        for (i, window) in domains.chunks(batch_size).enumerate() {
            if i > 0 {
                self.resolver.clear_cache();
            }
            results.extend(join_all(window.iter().map(|d| self.analyze_domain(d))).await);
        }
        results
    }
}

/// Run one mechanism check under a deadline. A disabled check is skipped; a
/// failed or timed-out one becomes a synthetic report plus an error line for
/// the aggregate `error` field.
async fn run_check<T, F>(
    enabled: bool,
    deadline: Duration,
    fut: F,
) -> (CheckReport<T>, Option<String>)
where
    T: MechanismReport,
    F: Future<Output = Result<T, CheckError>>,
{
    if !enabled {
        return (CheckReport::Skipped, None);
    }
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(report)) => (CheckReport::Checked(report), None),
        Ok(Err(e)) => {
            warn!(mechanism = T::MECHANISM, error = %e, "check failed");
            let reason = e.to_string();
            (
                CheckReport::Checked(T::failed(&reason)),
                Some(format!("{}: {reason}", T::MECHANISM)),
            )
        }
        Err(_) => {
            warn!(mechanism = T::MECHANISM, "check timed out");
            (
                CheckReport::Checked(T::failed("timed out")),
                Some(format!("{}: timed out", T::MECHANISM)),
            )
        }
    }
}

/// Checks whose meaning depends on another mechanism's outcome. Appends
/// issues only; never changes `found` flags or scores directly.
fn cross_validate(result: &mut DomainResult) {
    let dmarc_enforcing = result.dmarc.as_checked().map(|d| d.is_enforcing());
    if let (Some(bimi), Some(enforcing)) = (result.bimi.as_checked_mut(), dmarc_enforcing) {
        if bimi.found && !enforcing {
            bimi.issues.push(
                Issue::high(
                    "BIMI record is published but DMARC does not enforce (p=quarantine or \
                     p=reject required); mail clients will not display the logo",
                )
                .with_recommendation("Move DMARC to p=quarantine or p=reject to activate BIMI"),
            );
        }
    }

    let mx_hosts: Vec<String> = result
        .mx
        .as_checked()
        .filter(|m| m.found && !m.null_mx)
        .map(|m| m.hosts.iter().map(|h| h.exchange.clone()).collect())
        .unwrap_or_default();
    if let Some(sts) = result.mta_sts.as_checked_mut() {
        if sts.found && sts.policy_fetched && !sts.mx_patterns.is_empty() {
            for host in &mx_hosts {
                if !sts.mx_patterns.iter().any(|p| pattern_matches(p, host)) {
                    sts.issues.push(
                        Issue::high(format!(
                            "MX host {host} is not covered by any MTA-STS mx pattern; \
                             senders enforcing the policy will refuse to deliver through it"
                        ))
                        .with_recommendation(
                            "Add the missing MX host to the MTA-STS policy's mx list",
                        ),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dns::{DnsError, MockResolver, MxRecord};
    use crate::common::http::MockFetcher;
    use crate::common::issue::Severity;
    use crate::dnssec::{DnssecRecordType, MockQuerier};
    use base64::Engine;

    /// Resolver that stalls TXT lookups for one name, for deadline tests.
    #[derive(Clone)]
    struct StallingResolver {
        inner: MockResolver,
        stalled_name: String,
        delay: Duration,
    }

    impl DnsResolver for StallingResolver {
        async fn query_txt(&self, domain: &str) -> Result<Vec<String>, DnsError> {
            if domain == self.stalled_name {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.query_txt(domain).await
        }

        async fn query_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
            self.inner.query_mx(domain).await
        }

        fn clear_cache(&self) {
            self.inner.clear_cache();
        }
    }

    const BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";
    const BOOTSTRAP: &str =
        r#"{"services": [[["com"], ["https://rdap.verisign.com/com/v1/"]]]}"#;

    fn rdap_body() -> String {
        let expires = (Utc::now() + chrono::Duration::days(3000)).to_rfc3339();
        format!(
            r#"{{
                "status": ["active"],
                "events": [{{"eventAction": "expiration", "eventDate": "{expires}"}}],
                "entities": [{{
                    "roles": ["registrar"],
                    "vcardArray": ["vcard", [["fn", {{}}, "text", "Example Registrar"]]]
                }}]
            }}"#
        )
    }

    fn dkim_key_record() -> String {
        format!(
            "v=DKIM1; k=rsa; p={}",
            base64::engine::general_purpose::STANDARD.encode(vec![0u8; 294])
        )
    }

    struct Fixture {
        resolver: MockResolver,
        http: MockFetcher,
        querier: MockQuerier,
    }

    impl Fixture {
        fn new() -> Self {
            let http = MockFetcher::new();
            http.add_body(BOOTSTRAP_URL, BOOTSTRAP);
            Self {
                resolver: MockResolver::new(),
                http,
                querier: MockQuerier::new(),
            }
        }

        /// Seed every mechanism for `domain` with a well-configured setup.
        fn seed_perfect(&self, domain: &str) {
            self.resolver.add_txt(
                domain,
                vec!["v=spf1 include:_spf.example.net -all".to_string()],
            );
            self.resolver.add_txt(
                &format!("default._domainkey.{domain}"),
                vec![dkim_key_record()],
            );
            self.resolver.add_txt(
                &format!("_dmarc.{domain}"),
                vec!["v=DMARC1; p=reject; rua=mailto:dmarc@example.com".to_string()],
            );
            self.resolver.add_mx(
                domain,
                vec![
                    (1, format!("mx1.{domain}")),
                    (5, format!("mx2.{domain}")),
                ],
            );
            self.resolver.add_txt(
                &format!("_mta-sts.{domain}"),
                vec!["v=STSv1; id=20260801".to_string()],
            );
            self.http.add_body(
                &format!("https://mta-sts.{domain}/.well-known/mta-sts.txt"),
                &format!(
                    "version: STSv1\nmode: enforce\nmx: mx1.{domain}\nmx: mx2.{domain}\nmax_age: 604800\n"
                ),
            );
            self.resolver.add_txt(
                &format!("_smtp._tls.{domain}"),
                vec!["v=TLSRPTv1; rua=mailto:tls@example.com".to_string()],
            );
            self.resolver.add_txt(
                &format!("default._bimi.{domain}"),
                vec![
                    "v=BIMI1; l=https://example.com/logo.svg; a=https://example.com/vmc.pem"
                        .to_string(),
                ],
            );
            self.querier.add_answer(
                DnssecRecordType::Ds,
                domain,
                vec!["370 13 2 ABCDEF0123".to_string()],
            );
            self.querier.add_answer(
                DnssecRecordType::Dnskey,
                domain,
                vec![
                    "257 3 13 mdsswUyr3DPW132mOi8V9xESWE8jTo0dxCjjnopKl+GqJxpVXckHAeF+KkxLbxILfDLUT0rAK9iUzy1L53eKGQ==".to_string(),
                    "256 3 13 koPbw9wmYZ7ggcjnQ6ayHyhHaDNMYELKTqT+qRGrZpWSccr/lBcrm10Z1PuQHB3Azhii+sb0PYFkH1ruxLhe5g==".to_string(),
                ],
            );
            self.http.add_body(
                &format!("https://rdap.verisign.com/com/v1/domain/{domain}"),
                &rdap_body(),
            );
        }

        fn analyzer(&self) -> Analyzer<MockResolver, MockFetcher, MockQuerier> {
            self.analyzer_with(AnalyzerConfig {
                dkim_selectors: vec!["default".to_string()],
                ..AnalyzerConfig::default()
            })
        }

        fn analyzer_with(
            &self,
            config: AnalyzerConfig,
        ) -> Analyzer<MockResolver, MockFetcher, MockQuerier> {
            Analyzer::with_collaborators(
                config,
                self.resolver.clone(),
                self.http.clone(),
                self.querier.clone(),
            )
        }
    }

    #[tokio::test]
    async fn fully_configured_domain_grades_a() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        let result = fixture.analyzer().analyze_domain("example.com").await;

        assert!(result.score >= 90, "score was {}", result.score);
        assert_eq!(result.grade, Grade::A);
        assert!(result.error.is_none());
        assert!(result.spf.as_checked().unwrap().found);
        assert!(result.dkim.as_checked().unwrap().found);
        assert!(result.dmarc.as_checked().unwrap().is_enforcing());
        assert!(result.arc.as_checked().unwrap().ready);
        assert!(result.dnssec.as_checked().unwrap().enabled);
        assert_eq!(
            result.whois.as_checked().unwrap().registrar.as_deref(),
            Some("Example Registrar")
        );
    }

    #[tokio::test]
    async fn unconfigured_domain_grades_f() {
        let fixture = Fixture::new();
        // Registered in DNS with nothing configured.
        fixture.resolver.add_txt("bare.com", Vec::new());
        let result = fixture.analyzer().analyze_domain("bare.com").await;

        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
        assert!(!result.spf.as_checked().unwrap().found);
        assert!(!result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn invalid_domain_short_circuits() {
        let fixture = Fixture::new();
        let result = fixture.analyzer().analyze_domain("not a domain").await;

        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
        assert!(result.error.as_deref().unwrap().contains("Invalid domain"));
        assert!(result.spf.is_skipped());
        assert!(result.whois.is_skipped());
    }

    #[tokio::test]
    async fn input_is_normalized_before_checks() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        let result = fixture
            .analyzer()
            .analyze_domain("HTTPS://Example.COM./contact")
            .await;

        assert_eq!(result.domain, "example.com");
        assert!(result.spf.as_checked().unwrap().found);
    }

    #[tokio::test]
    async fn disabled_check_is_skipped_everywhere() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        let analyzer = fixture.analyzer_with(AnalyzerConfig {
            checks: CheckToggles {
                dkim: false,
                ..CheckToggles::default()
            },
            dkim_selectors: vec!["default".to_string()],
            ..AnalyzerConfig::default()
        });
        let result = analyzer.analyze_domain("example.com").await;

        assert!(result.dkim.is_skipped());
        // DKIM is an ARC prerequisite, so ARC is skipped too.
        assert!(result.arc.is_skipped());
        assert!(result
            .recommendations
            .iter()
            .all(|r| !r.contains("DKIM")));
        // The other three core mechanisms are perfect, so the score stays high.
        assert!(result.score >= 90, "score was {}", result.score);
    }

    #[tokio::test]
    async fn one_failing_check_does_not_poison_the_rest() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        fixture
            .resolver
            .set_failure("_dmarc.example.com", "connection refused");
        let result = fixture.analyzer().analyze_domain("example.com").await;

        let dmarc = result.dmarc.as_checked().unwrap();
        assert!(!dmarc.found);
        assert!(dmarc.issues.iter().any(|i| i.severity == Severity::High));
        assert!(result.error.as_deref().unwrap().contains("DMARC:"));
        assert!(result.spf.as_checked().unwrap().found);
        assert!(result.mx.as_checked().unwrap().found);
    }

    #[tokio::test]
    async fn timed_out_check_degrades_without_poisoning_siblings() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        let resolver = StallingResolver {
            inner: fixture.resolver.clone(),
            stalled_name: "_dmarc.example.com".to_string(),
            delay: Duration::from_secs(5),
        };
        let analyzer = Analyzer::with_collaborators(
            AnalyzerConfig {
                dkim_selectors: vec!["default".to_string()],
                check_timeout: Duration::from_millis(50),
                ..AnalyzerConfig::default()
            },
            resolver,
            fixture.http.clone(),
            fixture.querier.clone(),
        );
        let result = analyzer.analyze_domain("example.com").await;

        let dmarc = result.dmarc.as_checked().unwrap();
        assert!(!dmarc.found);
        assert_eq!(dmarc.issues.len(), 1);
        assert_eq!(dmarc.issues[0].severity, Severity::High);
        assert!(dmarc.issues[0].message.contains("timed out"));
        assert!(result.error.as_deref().unwrap().contains("DMARC: timed out"));
        assert!(result.spf.as_checked().unwrap().found);
        assert!(result.mx.as_checked().unwrap().found);
    }

    #[tokio::test]
    async fn spf_only_domain_grades_d() {
        let fixture = Fixture::new();
        fixture
            .resolver
            .add_txt("example.com", vec!["v=spf1 -all".to_string()]);
        let result = fixture.analyzer().analyze_domain("example.com").await;

        assert_eq!(result.score, 30);
        assert_eq!(result.grade, Grade::D);
    }

    #[tokio::test]
    async fn bimi_without_enforcing_dmarc_is_flagged() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        fixture.resolver.add_txt(
            "_dmarc.example.com",
            vec!["v=DMARC1; p=none; rua=mailto:d@example.com".to_string()],
        );
        let result = fixture.analyzer().analyze_domain("example.com").await;

        let bimi = result.bimi.as_checked().unwrap();
        assert!(bimi.found);
        assert!(bimi
            .issues
            .iter()
            .any(|i| i.severity == Severity::High && i.message.contains("DMARC")));
    }

    #[tokio::test]
    async fn mta_sts_policy_must_cover_all_mx_hosts() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        fixture.http.add_body(
            "https://mta-sts.example.com/.well-known/mta-sts.txt",
            "version: STSv1\nmode: enforce\nmx: mx1.example.com\nmax_age: 604800\n",
        );
        let result = fixture.analyzer().analyze_domain("example.com").await;

        let sts = result.mta_sts.as_checked().unwrap();
        assert!(sts
            .issues
            .iter()
            .any(|i| i.severity == Severity::High
                && i.message.contains("mx2.example.com")));
    }

    #[tokio::test]
    async fn recommendations_lead_with_the_most_severe() {
        let fixture = Fixture::new();
        fixture.resolver.add_txt("bare.com", Vec::new());
        let result = fixture.analyzer().analyze_domain("bare.com").await;

        // Missing SPF is critical and must outrank everything else.
        assert!(result.recommendations[0].contains("SPF"));
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        fixture.resolver.add_txt("bare.com", Vec::new());
        let analyzer = fixture.analyzer_with(AnalyzerConfig {
            dkim_selectors: vec!["default".to_string()],
            batch_size: 2,
            ..AnalyzerConfig::default()
        });

        let domains = vec![
            "bare.com".to_string(),
            "example.com".to_string(),
            "not a domain".to_string(),
        ];
        let results = analyzer.analyze_many(&domains).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].domain, "bare.com");
        assert_eq!(results[1].domain, "example.com");
        assert!(results[2].error.as_deref().unwrap().contains("Invalid"));
    }

    #[tokio::test]
    async fn batch_clears_resolver_cache_between_windows() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        let analyzer = fixture.analyzer_with(AnalyzerConfig {
            dkim_selectors: vec!["default".to_string()],
            batch_size: 1,
            ..AnalyzerConfig::default()
        });

        let domains = vec![
            "example.com".to_string(),
            "example.com".to_string(),
            "example.com".to_string(),
        ];
        analyzer.analyze_many(&domains).await;

        assert_eq!(fixture.resolver.cache_clear_count(), 2);
    }

    #[tokio::test]
    async fn dnssec_tool_missing_degrades_without_error() {
        let fixture = Fixture::new();
        fixture.seed_perfect("example.com");
        fixture.querier.set_tool_missing();
        let result = fixture.analyzer().analyze_domain("example.com").await;

        assert!(result.error.is_none());
        let dnssec = result.dnssec.as_checked().unwrap();
        assert!(!dnssec.enabled);
        assert!(dnssec.issues.iter().any(|i| i.message.contains("dig")));
    }

    #[test]
    fn default_config_probes_the_common_selectors() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.dkim_selectors.len(), DEFAULT_SELECTORS.len());
        assert_eq!(config.check_timeout, Duration::from_secs(10));
        assert_eq!(config.batch_size, 5);
    }
}
