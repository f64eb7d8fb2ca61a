//! OAuth 2.0 refresh-token grant.
//!
//! Exchanges a stored long-lived refresh token for a short-lived bearer
//! access token. One exchange attempt per invocation; no retry, no token
//! caching — the access token's lifetime is the single logical call.

use std::time::Duration;

use tracing::debug;

use crate::credentials::ClientCredential;
use crate::error::{ProviderError, ProviderResult, truncate_body};
use crate::google::config::ERROR_SNIPPET_LIMIT;

/// Client for the OAuth token endpoint.
#[derive(Debug)]
pub struct TokenExchanger {
    http_client: reqwest::Client,
    token_url: String,
}

impl TokenExchanger {
    /// Creates a new token exchanger against the given endpoint.
    pub fn new(token_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            token_url: token_url.into(),
        }
    }

    /// Performs the refresh-token grant and returns the access token.
    ///
    /// Sends a form-encoded POST with `grant_type=refresh_token`. A
    /// non-success status fails with a token-exchange error carrying the
    /// status and a truncated body snippet; a success response without an
    /// `access_token` field fails likewise.
    ///
    /// # Errors
    ///
    /// Returns a network error on transport failure, a token-exchange error
    /// on a bad status or missing token, and an invalid-response error when
    /// the body is not JSON.
    pub async fn exchange(
        &self,
        credential: &ClientCredential,
        refresh_token: &str,
    ) -> ProviderResult<String> {
        let params = [
            ("client_id", credential.client_id.as_str()),
            ("client_secret", credential.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("token request timeout")
                } else {
                    ProviderError::network(format!("token request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read token response: {e}")))?;

        if !status.is_success() {
            return Err(ProviderError::token_exchange(format!(
                "token refresh failed: {}",
                truncate_body(&body, ERROR_SNIPPET_LIMIT)
            ))
            .with_status(status.as_u16()));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {e}"))
        })?;

        let access_token = token_response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ProviderError::token_exchange("token response missing access_token")
                    .with_status(status.as_u16())
            })?;

        debug!("obtained access token");
        Ok(access_token)
    }
}

/// Response from the token endpoint.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_parses() {
        let json = r#"{
            "access_token": "ya29.token",
            "expires_in": 3599,
            "token_type": "Bearer"
        }"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("ya29.token"));
    }

    #[test]
    fn token_response_without_access_token_parses() {
        let json = r#"{"scope": "calendar.readonly"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert!(response.access_token.is_none());
    }
}
