use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

// dot-atom local part, then dot-separated host labels of at most 63 characters
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid regex")
});

/// Strategy for deciding whether an email host can receive mail
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// True when `domain` resolves to at least one address
    async fn resolves(&self, domain: &str) -> bool;
}

/// Resolves hosts through the system resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct DnsHostResolver;

#[async_trait]
impl HostResolver for DnsHostResolver {
    async fn resolves(&self, domain: &str) -> bool {
        match tokio::net::lookup_host((domain, 25)).await {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(e) => {
                tracing::debug!("host lookup for {} failed: {}", domain, e);
                false
            }
        }
    }
}

/// Resolves only the hosts it was given
#[derive(Debug, Default, Clone)]
pub struct StaticHostResolver {
    hosts: HashSet<String>,
}

impl StaticHostResolver {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.into().to_ascii_lowercase())
                .collect(),
        }
    }
}

#[async_trait]
impl HostResolver for StaticHostResolver {
    async fn resolves(&self, domain: &str) -> bool {
        self.hosts.contains(&domain.to_ascii_lowercase())
    }
}

/// Validates email addresses for format and host resolvability
#[derive(Clone)]
pub struct EmailValidatorProvider {
    resolver: Arc<dyn HostResolver>,
}

impl EmailValidatorProvider {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self { resolver }
    }

    /// Check the address is a well-formed dot-atom address
    pub fn validate_format(&self, email: &str) -> Result<(), EmailValidationError> {
        if EMAIL_RE.is_match(email) {
            Ok(())
        } else {
            Err(EmailValidationError::BadFormat)
        }
    }

    /// Check the host part of the address resolves
    ///
    /// Expects an address that already passed `validate_format`.
    pub async fn validate_host(&self, email: &str) -> Result<(), EmailValidationError> {
        let domain = email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .ok_or(EmailValidationError::BadFormat)?;

        if self.resolver.resolves(domain).await {
            Ok(())
        } else {
            tracing::debug!("email host {} did not resolve", domain);
            Err(EmailValidationError::UnresolvableHost)
        }
    }
}

/// Email validation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("invalid format")]
    BadFormat,

    #[error("unresolvable host")]
    UnresolvableHost,
}
