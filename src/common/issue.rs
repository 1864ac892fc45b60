use serde::Serialize;

/// How bad a finding is. Ordering: `Critical > High > Medium > Low > Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// A single finding attached to one mechanism's report.
///
/// Immutable once created. The optional `recommendation` is what the
/// recommendation engine surfaces to the user; issues without one are
/// informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Issue {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            recommendation: None,
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, message)
    }

    pub fn high(message: impl Into<String>) -> Self {
        Self::new(Severity::High, message)
    }

    pub fn medium(message: impl Into<String>) -> Self {
        Self::new(Severity::Medium, message)
    }

    pub fn low(message: impl Into<String>) -> Self {
        Self::new(Severity::Low, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn builder_attaches_recommendation() {
        let issue = Issue::high("weak key").with_recommendation("rotate to 2048 bits");
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.recommendation.as_deref(), Some("rotate to 2048 bits"));
    }

    #[test]
    fn plain_issue_has_no_recommendation() {
        let issue = Issue::info("provider detected");
        assert!(issue.recommendation.is_none());
    }
}
