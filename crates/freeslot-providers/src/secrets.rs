//! Secret-source collaborator.
//!
//! The engine never owns secret storage or caching; it consumes credentials
//! through the [`SecretSource`] contract, one `fetch_secret` call per
//! credential. Callers inject whatever store they use (a managed secrets
//! service, a vault, a test double). [`EnvSecretSource`] resolves secret
//! names to environment variables for local runs and tests.

use crate::error::{ProviderError, ProviderResult};

/// Supplier of raw secret blobs, keyed by logical name.
///
/// Implementations return the raw JSON-encoded blob for the given name and
/// fail with a credential error when the secret is missing or unauthorized.
/// Any caching is the implementation's concern; the engine treats every
/// returned blob as freshly supplied input.
pub trait SecretSource: Send + Sync {
    /// Fetches the raw secret blob for the given logical name.
    fn fetch_secret(&self, name: &str) -> ProviderResult<String>;
}

/// A [`SecretSource`] backed by environment variables.
///
/// The logical secret name is mapped to a variable name by uppercasing and
/// replacing every character outside `[A-Za-z0-9]` with `_`, so e.g.
/// `user-secret/alice@example.com` resolves `USER_SECRET_ALICE_EXAMPLE_COM`.
#[derive(Debug, Default)]
pub struct EnvSecretSource;

impl EnvSecretSource {
    /// Creates a new environment-backed secret source.
    pub fn new() -> Self {
        Self
    }

    fn var_name(secret_name: &str) -> String {
        secret_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl SecretSource for EnvSecretSource {
    fn fetch_secret(&self, name: &str) -> ProviderResult<String> {
        let var = Self::var_name(name);
        std::env::var(&var).map_err(|_| {
            ProviderError::credential(format!("missing secret: {name}")).with_secret_name(name)
        })
    }
}
