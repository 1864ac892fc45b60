//! Domain security assessment: SPF, DKIM, DMARC, MX, BIMI, MTA-STS, TLS-RPT,
//! ARC readiness, DNSSEC, and registration data, folded into a 0-100 score
//! with a letter grade and prioritized recommendations.
//!
//! The entry point is [`Analyzer`]:
//!
//! ```no_run
//! use mxaudit::{Analyzer, AnalyzerConfig};
//!
//! # async fn run() {
//! let analyzer = Analyzer::new(AnalyzerConfig::default());
//! let result = analyzer.analyze_domain("example.com").await;
//! println!("{}: {:?} ({})", result.domain, result.grade, result.score);
//! # }
//! ```
//!
//! Every check runs against published records only; no mail is sent and no
//! signatures are verified. DNS, HTTPS, and subprocess collaborators sit
//! behind traits (`DnsResolver`, `HttpFetcher`, `RecordQuerier`) so the whole
//! pipeline is testable without the network.

pub mod analyzer;
pub mod arc;
pub mod bimi;
pub mod common;
pub mod dkim;
pub mod dmarc;
pub mod dnssec;
pub mod mta_sts;
pub mod mx;
pub mod rdap;
pub mod report;
pub mod score;
pub mod spf;
pub mod tlsrpt;

pub use analyzer::{Analyzer, AnalyzerConfig, CheckToggles};
pub use common::issue::{Issue, Severity};
pub use common::CheckError;
pub use report::{CheckReport, DomainResult, Grade};
