use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    /// The resource does not exist (HTTP 404). Validators map this to
    /// `found=false`, never to a check failure.
    #[error("not found")]
    NotFound,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("timeout")]
    Timeout,
    #[error("HTTP error: {0}")]
    Other(String),
}

impl HttpError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpError::NotFound)
    }
}

/// HTTP fetch trait for abstracting HTTPS document retrieval.
///
/// The timeout must be enforced by the transport itself so the request is
/// actually cancelled when the deadline elapses, not merely abandoned.
pub trait HttpFetcher: Clone + Send + Sync + 'static {
    fn fetch_text(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, HttpError>> + Send;
}

/// Reqwest-backed fetcher.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mxaudit/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    fn classify_error(e: reqwest::Error) -> HttpError {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Other(e.to_string())
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher for ReqwestFetcher {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, HttpError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(Self::classify_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HttpError::NotFound);
        }
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        response.text().await.map_err(Self::classify_error)
    }
}

/// Mock HTTP fetcher for testing
#[derive(Clone, Default)]
pub struct MockFetcher {
    bodies: Arc<Mutex<HashMap<String, String>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&self, url: &str, body: &str) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    pub fn set_failure(&self, url: &str, reason: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(url.to_string(), reason.to_string());
    }
}

impl HttpFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str, _timeout: Duration) -> Result<String, HttpError> {
        if let Some(reason) = self.failures.lock().unwrap().get(url) {
            return Err(HttpError::Other(reason.clone()));
        }
        match self.bodies.lock().unwrap().get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(HttpError::NotFound),
        }
    }
}
