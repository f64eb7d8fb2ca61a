//! Google availability provider configuration.

use std::time::Duration;

use crate::error::{ProviderError, ProviderResult};

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default base URL for the Calendar API v3.
pub const DEFAULT_EVENTS_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Cap on error-message body snippets, in bytes.
pub const ERROR_SNIPPET_LIMIT: usize = 256;

/// Environment variable naming the shared client-credential secret.
pub const CLIENT_SECRET_NAME_VAR: &str = "GOOGLE_OAUTH_CLIENT_SECRET_NAME";

/// Environment variable holding the per-user secret-name prefix.
pub const USER_SECRET_PREFIX_VAR: &str = "GOOGLE_OAUTH_USER_SECRET_PREFIX";

/// Configuration for the Google availability provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Logical name of the shared OAuth client-credential secret.
    pub client_secret_name: String,

    /// Prefix concatenated with a user's email address to form that user's
    /// secret name.
    pub user_secret_prefix: String,

    /// OAuth token endpoint URL.
    pub token_url: String,

    /// Base URL of the events API (overridable for tests).
    pub events_base_url: String,

    /// Per-request timeout for all outbound HTTP calls.
    pub timeout: Duration,
}

impl GoogleConfig {
    /// Default per-request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Creates a new configuration with the given secret names and default
    /// endpoints.
    pub fn new(
        client_secret_name: impl Into<String>,
        user_secret_prefix: impl Into<String>,
    ) -> Self {
        Self {
            client_secret_name: client_secret_name.into(),
            user_secret_prefix: user_secret_prefix.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            events_base_url: DEFAULT_EVENTS_BASE_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builds a configuration from the environment.
    ///
    /// Reads `GOOGLE_OAUTH_CLIENT_SECRET_NAME` and
    /// `GOOGLE_OAUTH_USER_SECRET_PREFIX`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when either variable is absent or
    /// empty.
    pub fn from_env() -> ProviderResult<Self> {
        let client_secret_name = require_env(CLIENT_SECRET_NAME_VAR)?;
        let user_secret_prefix = require_env(USER_SECRET_PREFIX_VAR)?;
        Ok(Self::new(client_secret_name, user_secret_prefix))
    }

    /// Sets the token endpoint URL.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Sets the events API base URL.
    pub fn with_events_base_url(mut self, url: impl Into<String>) -> Self {
        self.events_base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.client_secret_name.is_empty() {
            return Err(ProviderError::configuration(
                "client_secret_name is required",
            ));
        }
        if self.user_secret_prefix.is_empty() {
            return Err(ProviderError::configuration("user_secret_prefix is required"));
        }
        if self.token_url.is_empty() {
            return Err(ProviderError::configuration("token_url is required"));
        }
        if self.events_base_url.is_empty() {
            return Err(ProviderError::configuration("events_base_url is required"));
        }
        Ok(())
    }
}

fn require_env(var: &str) -> ProviderResult<String> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ProviderError::configuration(format!("{var} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[test]
    fn config_creation_defaults() {
        let config = GoogleConfig::new("client-secret", "user-secret/");
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.events_base_url, DEFAULT_EVENTS_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_methods() {
        let config = GoogleConfig::new("client-secret", "user-secret/")
            .with_token_url("http://localhost:9999/token")
            .with_events_base_url("http://localhost:9999/calendar/v3")
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.token_url, "http://localhost:9999/token");
        assert_eq!(config.events_base_url, "http://localhost:9999/calendar/v3");
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn config_validation_rejects_empty_fields() {
        let config = GoogleConfig::new("", "user-secret/");
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Configuration);

        let config = GoogleConfig::new("client-secret", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_env_missing_vars_fails() {
        // Variables unset in the test environment
        unsafe {
            std::env::remove_var(CLIENT_SECRET_NAME_VAR);
            std::env::remove_var(USER_SECRET_PREFIX_VAR);
        }
        let err = GoogleConfig::from_env().unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Configuration);
        assert!(err.message().contains(CLIENT_SECRET_NAME_VAR));
    }
}
