//! Credential resolution.
//!
//! Turns two opaque secret blobs into typed records: a shared OAuth client
//! credential and a per-user calendar credential. Resolution fails fast with
//! a credential error on missing blobs, invalid JSON or absent/empty
//! required fields. Secret values are redacted from `Debug` output and never
//! logged.

use std::fmt;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};
use crate::secrets::SecretSource;

/// Calendar id used when a user credential does not name one.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Shared OAuth 2.0 client credential, sourced from one secret blob.
///
/// Immutable for the duration of a call; `client_secret` never appears in
/// `Debug` output or logs.
#[derive(Clone)]
pub struct ClientCredential {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
}

/// Structure of the client-credential secret blob.
#[derive(Debug, Deserialize)]
struct ClientCredentialBlob {
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl ClientCredential {
    /// Resolves the shared client credential from the secret store.
    ///
    /// One `fetch_secret` call; fails with a credential error when the blob
    /// is missing, not valid JSON, or `client_id`/`client_secret` are absent
    /// or empty.
    pub fn resolve(source: &dyn SecretSource, secret_name: &str) -> ProviderResult<Self> {
        let raw = source.fetch_secret(secret_name)?;
        let blob: ClientCredentialBlob = serde_json::from_str(&raw).map_err(|e| {
            ProviderError::credential(format!("secret {secret_name} is not valid JSON"))
                .with_secret_name(secret_name)
                .with_source(e)
        })?;

        let client_id = non_empty(blob.client_id).ok_or_else(|| {
            ProviderError::credential("client secret missing client_id")
                .with_secret_name(secret_name)
        })?;
        let client_secret = non_empty(blob.client_secret).ok_or_else(|| {
            ProviderError::credential("client secret missing client_secret")
                .with_secret_name(secret_name)
        })?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

impl fmt::Debug for ClientCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Per-user calendar credential, sourced from a secret blob keyed by the
/// user's email address.
///
/// Immutable for the duration of a call; `refresh_token` never appears in
/// `Debug` output or logs.
#[derive(Clone)]
pub struct UserCredential {
    /// Long-lived OAuth refresh token for this user.
    pub refresh_token: String,
    /// Calendar to query; defaults to [`DEFAULT_CALENDAR_ID`].
    pub calendar_id: String,
    /// IANA timezone for date-only event interpretation, when configured.
    pub time_zone: Option<String>,
}

/// Structure of the per-user secret blob.
#[derive(Debug, Deserialize)]
struct UserCredentialBlob {
    refresh_token: Option<String>,
    calendar_id: Option<String>,
    time_zone: Option<String>,
}

impl UserCredential {
    /// Builds the logical secret name for a user: configured prefix followed
    /// by the email address.
    pub fn secret_name(prefix: &str, email: &str) -> String {
        format!("{prefix}{email}")
    }

    /// Resolves a user's calendar credential from the secret store.
    ///
    /// One `fetch_secret` call against `prefix + email`; fails with a
    /// credential error when the blob is missing, not valid JSON, or
    /// `refresh_token` is absent or empty. `calendar_id` defaults to
    /// `"primary"`; `time_zone` is optional.
    pub fn resolve(source: &dyn SecretSource, prefix: &str, email: &str) -> ProviderResult<Self> {
        let secret_name = Self::secret_name(prefix, email);
        let raw = source.fetch_secret(&secret_name)?;
        let blob: UserCredentialBlob = serde_json::from_str(&raw).map_err(|e| {
            ProviderError::credential(format!("secret {secret_name} is not valid JSON"))
                .with_secret_name(&secret_name)
                .with_source(e)
        })?;

        let refresh_token = non_empty(blob.refresh_token).ok_or_else(|| {
            ProviderError::credential("user secret missing refresh_token")
                .with_secret_name(&secret_name)
        })?;

        Ok(Self {
            refresh_token,
            calendar_id: non_empty(blob.calendar_id)
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            time_zone: non_empty(blob.time_zone),
        })
    }
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("refresh_token", &"<redacted>")
            .field("calendar_id", &self.calendar_id)
            .field("time_zone", &self.time_zone)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
