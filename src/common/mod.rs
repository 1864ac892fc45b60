//! Common infrastructure shared across all mechanism checks.

pub mod dns;
pub mod domain;
pub mod http;
pub mod issue;
pub mod tags;

use thiserror::Error;

/// Transport or tool failure during one mechanism's check.
///
/// "Record absent" conditions never become a `CheckError`; validators map
/// them to `found=false` before errors can propagate. The orchestrator
/// converts a `CheckError` into a synthetic failed report and an entry in
/// the aggregate error field, without aborting sibling checks.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("DNS lookup failed: {0}")]
    Dns(#[from] dns::DnsError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] http::HttpError),
    #[error("resolver tool failed: {0}")]
    Tool(String),
}
