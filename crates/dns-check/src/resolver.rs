use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use thiserror::Error;
use verify_types::MxRecord;

#[derive(Clone, Debug, Error)]
pub enum DnsError {
    #[error("invalid DNS name: {0}")]
    InvalidName(String),
    #[error("DNS resolution failed: {0}")]
    ResolveFailed(String),
}

/// Abstraction over DNS resolution so that `check_dns`/`check_spf`/
/// `check_dmarc` can run against either a real resolver or a fake one in
/// tests, mirroring the teacher's `Resolver`/`Lookup` traits.
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError>;
    async fn resolve_a(&self, domain: &str) -> Result<Vec<IpAddr>, DnsError>;
    async fn resolve_txt(&self, name: &str) -> Result<Vec<String>, DnsError>;
}

/// `Lookup` backed by a real `hickory_resolver::TokioResolver`.
pub struct HickoryLookup {
    inner: hickory_resolver::TokioResolver,
}

impl HickoryLookup {
    pub fn new() -> Result<Self, hickory_resolver::ResolveError> {
        Ok(Self {
            inner: hickory_resolver::TokioResolver::builder_tokio()?.build(),
        })
    }
}

#[async_trait]
impl Lookup for HickoryLookup {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        self.inner
            .mx_lookup(domain)
            .await
            .map_err(|err| DnsError::ResolveFailed(format!("{domain}: {err}")))?
            .into_iter()
            .map(|mx| {
                Ok(MxRecord {
                    exchange: mx.exchange().to_utf8(),
                    priority: mx.preference(),
                })
            })
            .collect()
    }

    async fn resolve_a(&self, domain: &str) -> Result<Vec<IpAddr>, DnsError> {
        self.inner
            .lookup_ip(domain)
            .await
            .map_err(|err| DnsError::ResolveFailed(format!("{domain}: {err}")))?
            .into_iter()
            .map(Ok)
            .collect()
    }

    async fn resolve_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        self.inner
            .txt_lookup(name)
            .await
            .map_err(|err| DnsError::ResolveFailed(format!("{name}: {err}")))?
            .into_iter()
            .map(|txt| {
                let joined: String = txt
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                    .collect();
                Ok(joined)
            })
            .collect()
    }
}

/// An in-memory `Lookup` for tests, analogous to the teacher's
/// `TestResolver`. Records are keyed by exact domain name; lookups for any
/// other name return empty results (not an error) unless `failing()` was
/// set, in which case every lookup returns `Err`.
#[derive(Default)]
pub struct FakeLookup {
    mx: Mutex<HashMap<String, Vec<MxRecord>>>,
    a: Mutex<HashMap<String, Vec<IpAddr>>>,
    txt: Mutex<HashMap<String, Vec<String>>>,
    fail: bool,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mx(self, domain: &str, records: Vec<MxRecord>) -> Self {
        self.mx.lock().unwrap().insert(domain.to_string(), records);
        self
    }

    pub fn with_a(self, domain: &str, addrs: Vec<IpAddr>) -> Self {
        self.a.lock().unwrap().insert(domain.to_string(), addrs);
        self
    }

    pub fn with_txt(self, name: &str, records: Vec<String>) -> Self {
        self.txt.lock().unwrap().insert(name.to_string(), records);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl Lookup for FakeLookup {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        if self.fail {
            return Err(DnsError::ResolveFailed("simulated failure".into()));
        }
        Ok(self.mx.lock().unwrap().get(domain).cloned().unwrap_or_default())
    }

    async fn resolve_a(&self, domain: &str) -> Result<Vec<IpAddr>, DnsError> {
        if self.fail {
            return Err(DnsError::ResolveFailed("simulated failure".into()));
        }
        Ok(self.a.lock().unwrap().get(domain).cloned().unwrap_or_default())
    }

    async fn resolve_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        if self.fail {
            return Err(DnsError::ResolveFailed("simulated failure".into()));
        }
        Ok(self.txt.lock().unwrap().get(name).cloned().unwrap_or_default())
    }
}
