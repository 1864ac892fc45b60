use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Record types the external resolver tool is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnssecRecordType {
    Ds,
    Dnskey,
}

impl DnssecRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnssecRecordType::Ds => "DS",
            DnssecRecordType::Dnskey => "DNSKEY",
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    /// The external tool is not installed. Mapped to a high-severity issue
    /// on the DNSSEC report, not to a check failure.
    #[error("external resolver tool not found: {0}")]
    ToolMissing(String),
    #[error("resolver query failed: {0}")]
    Failed(String),
}

/// External resolver subprocess collaborator: raw text lines for a DS or
/// DNSKEY query, or a distinguishable "tool not found" failure.
pub trait RecordQuerier: Clone + Send + Sync + 'static {
    fn query(
        &self,
        record_type: DnssecRecordType,
        domain: &str,
        resolver: Option<IpAddr>,
    ) -> impl Future<Output = Result<Vec<String>, QueryError>> + Send;
}

/// `dig +short` backed querier.
#[derive(Clone, Default)]
pub struct DigQuerier;

impl DigQuerier {
    pub fn new() -> Self {
        Self
    }
}

impl RecordQuerier for DigQuerier {
    async fn query(
        &self,
        record_type: DnssecRecordType,
        domain: &str,
        resolver: Option<IpAddr>,
    ) -> Result<Vec<String>, QueryError> {
        let mut cmd = Command::new("dig");
        if let Some(ip) = resolver {
            cmd.arg(format!("@{ip}"));
        }
        cmd.arg("+short")
            .arg(record_type.as_str())
            .arg(domain)
            .stdin(Stdio::null());

        debug!(domain, record_type = record_type.as_str(), "running dig");
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                QueryError::ToolMissing("dig".to_string())
            } else {
                QueryError::Failed(e.to_string())
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(QueryError::Failed(format!(
                "dig exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Mock querier for testing
#[derive(Clone, Default)]
pub struct MockQuerier {
    answers: Arc<Mutex<HashMap<(DnssecRecordType, String), Vec<String>>>>,
    tool_missing: Arc<Mutex<bool>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_answer(&self, record_type: DnssecRecordType, domain: &str, lines: Vec<String>) {
        self.answers
            .lock()
            .unwrap()
            .insert((record_type, domain.to_lowercase()), lines);
    }

    pub fn set_tool_missing(&self) {
        *self.tool_missing.lock().unwrap() = true;
    }

    pub fn set_failure(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }
}

impl RecordQuerier for MockQuerier {
    async fn query(
        &self,
        record_type: DnssecRecordType,
        domain: &str,
        _resolver: Option<IpAddr>,
    ) -> Result<Vec<String>, QueryError> {
        if *self.tool_missing.lock().unwrap() {
            return Err(QueryError::ToolMissing("dig".to_string()));
        }
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(QueryError::Failed(reason));
        }
        Ok(self
            .answers
            .lock()
            .unwrap()
            .get(&(record_type, domain.to_lowercase()))
            .cloned()
            .unwrap_or_default())
    }
}
