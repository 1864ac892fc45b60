use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DnsError {
    /// The name does not exist, or exists with no data of the queried type.
    /// Validators map this to `found=false`, never to a check failure.
    #[error("NXDOMAIN: no such name or no data")]
    NxDomain,
    #[error("SERVFAIL: server failure")]
    ServFail,
    #[error("timeout")]
    Timeout,
    #[error("DNS error: {0}")]
    Other(String),
}

impl DnsError {
    /// Whether this error means "record absent" rather than "lookup broken".
    pub fn is_not_found(&self) -> bool {
        matches!(self, DnsError::NxDomain)
    }
}

/// An MX record: (preference, exchange host with trailing dot stripped).
pub type MxRecord = (u16, String);

/// DNS resolver trait for abstracting DNS lookups.
///
/// `clear_cache` is called between batch windows so one window's answers
/// never leak into the next.
pub trait DnsResolver: Clone + Send + Sync + 'static {
    fn query_txt(&self, domain: &str) -> impl Future<Output = Result<Vec<String>, DnsError>> + Send;
    fn query_mx(&self, domain: &str) -> impl Future<Output = Result<Vec<MxRecord>, DnsError>> + Send;
    fn clear_cache(&self);
}

/// Hickory DNS resolver implementation
#[derive(Clone)]
pub struct HickoryResolver {
    resolver: TokioResolver,
}

impl HickoryResolver {
    pub fn new() -> Self {
        let resolver = TokioResolver::builder_with_config(
            ResolverConfig::default(),
            TokioConnectionProvider::default(),
        )
        .build();
        Self { resolver }
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();
        Self { resolver }
    }

    fn classify_error(e: &hickory_resolver::ResolveError) -> DnsError {
        let msg = e.to_string().to_lowercase();
        if msg.contains("nxdomain") || msg.contains("no records") {
            DnsError::NxDomain
        } else if msg.contains("timeout") {
            DnsError::Timeout
        } else if msg.contains("servfail") {
            DnsError::ServFail
        } else {
            DnsError::Other(e.to_string())
        }
    }
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsResolver for HickoryResolver {
    async fn query_txt(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        match self.resolver.txt_lookup(domain).await {
            Ok(lookup) => Ok(lookup.iter().map(|txt| txt.to_string()).collect()),
            Err(e) => Err(Self::classify_error(&e)),
        }
    }

    async fn query_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => {
                let records: Vec<MxRecord> = lookup
                    .iter()
                    .map(|mx| {
                        (
                            mx.preference(),
                            mx.exchange().to_string().trim_end_matches('.').to_string(),
                        )
                    })
                    .collect();
                Ok(records)
            }
            Err(e) => Err(Self::classify_error(&e)),
        }
    }

    fn clear_cache(&self) {
        self.resolver.clear_cache();
    }
}

/// Mock DNS resolver for testing
#[derive(Clone, Default)]
pub struct MockResolver {
    txt_records: Arc<Mutex<HashMap<String, Vec<String>>>>,
    mx_records: Arc<Mutex<HashMap<String, Vec<MxRecord>>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    cache_clears: Arc<Mutex<u32>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_txt(&self, domain: &str, records: Vec<String>) {
        self.txt_records
            .lock()
            .unwrap()
            .insert(domain.to_lowercase(), records);
    }

    pub fn add_mx(&self, domain: &str, records: Vec<MxRecord>) {
        self.mx_records
            .lock()
            .unwrap()
            .insert(domain.to_lowercase(), records);
    }

    /// Make every lookup for `domain` fail with a transport error.
    pub fn set_failure(&self, domain: &str, reason: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(domain.to_lowercase(), reason.to_string());
    }

    pub fn cache_clear_count(&self) -> u32 {
        *self.cache_clears.lock().unwrap()
    }

    fn check_failure(&self, domain: &str) -> Result<(), DnsError> {
        if let Some(reason) = self.failures.lock().unwrap().get(&domain.to_lowercase()) {
            return Err(DnsError::Other(reason.clone()));
        }
        Ok(())
    }
}

impl DnsResolver for MockResolver {
    async fn query_txt(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        self.check_failure(domain)?;
        match self.txt_records.lock().unwrap().get(&domain.to_lowercase()) {
            Some(records) => Ok(records.clone()),
            None => Err(DnsError::NxDomain),
        }
    }

    async fn query_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        self.check_failure(domain)?;
        match self.mx_records.lock().unwrap().get(&domain.to_lowercase()) {
            Some(records) => Ok(records.clone()),
            None => Err(DnsError::NxDomain),
        }
    }

    fn clear_cache(&self) {
        *self.cache_clears.lock().unwrap() += 1;
    }
}
