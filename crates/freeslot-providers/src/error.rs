//! Error types for availability provider operations.
//!
//! This module defines the error taxonomy for the availability pipeline:
//! configuration, credential resolution, token exchange, page fetching and
//! provider lookup. Every fatal error propagates to the caller as a distinct,
//! inspectable value; nothing is retried inside the engine.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
///
/// This enum provides a high-level classification of errors for use by
/// callers deciding whether to surface, log or redeliver an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Required configuration (endpoint names, secret-name prefixes) absent.
    Configuration,
    /// A secret blob is missing, not valid JSON, or missing a required field.
    Credential,
    /// The OAuth refresh-token grant failed.
    TokenExchange,
    /// A page request returned a bad status or an unparsable body.
    PageFetch,
    /// Registry lookup failed - caller configuration bug.
    UnknownProvider,
    /// Transport-level failure: connection, timeout, DNS.
    Network,
    /// A response could not be interpreted (outside the page-fetch path).
    InvalidResponse,
}

impl ProviderErrorCode {
    /// Returns true if this error is transient and the caller's policy layer
    /// (e.g. queue redelivery) may reasonably retry the invocation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::PageFetch)
    }

    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration_error",
            Self::Credential => "credential_error",
            Self::TokenExchange => "token_exchange_error",
            Self::PageFetch => "page_fetch_error",
            Self::UnknownProvider => "unknown_provider",
            Self::Network => "network_error",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from the availability pipeline.
///
/// Carries enough context for logging and inspection: the error code, a
/// message, the provider name, the HTTP status where one was involved, and
/// the secret name where credential resolution failed. Secret values never
/// appear here.
#[derive(Debug, Error)]
pub struct ProviderError {
    /// The error code categorizing this error.
    code: ProviderErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The provider that generated this error (e.g., "google").
    provider: Option<String>,
    /// The HTTP status of the failed upstream call, if any.
    status: Option<u16>,
    /// The logical secret name involved in a credential failure, if any.
    secret_name: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            status: None,
            secret_name: None,
            source: None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Configuration, message)
    }

    /// Creates a credential error.
    pub fn credential(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Credential, message)
    }

    /// Creates a token exchange error.
    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::TokenExchange, message)
    }

    /// Creates a page fetch error.
    pub fn page_fetch(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::PageFetch, message)
    }

    /// Creates an unknown provider error.
    pub fn unknown_provider(name: &str) -> Self {
        Self::new(
            ProviderErrorCode::UnknownProvider,
            format!("unknown calendar provider: {name}"),
        )
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Network, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the upstream HTTP status for this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the logical secret name for this error.
    pub fn with_secret_name(mut self, name: impl Into<String>) -> Self {
        self.secret_name = Some(name.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider name, if set.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Returns the upstream HTTP status, if set.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the logical secret name, if set.
    pub fn secret_name(&self) -> Option<&str> {
        self.secret_name.as_deref()
    }

    /// Returns true if this error is transient and may be retried by the
    /// caller's policy layer.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{provider}] ")?;
        }
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        Ok(())
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Truncates a response body to `limit` bytes for diagnostics, respecting
/// UTF-8 boundaries.
pub(crate) fn truncate_body(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }
    let mut end = limit;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
