//! Google Calendar availability provider.
//!
//! This module provides a [`GoogleAvailabilityProvider`] that resolves a
//! person's open meeting slots from their Google Calendar busy time.
//!
//! # Pipeline
//!
//! 1. Resolve the shared OAuth client credential from the secret store
//! 2. Resolve the user's credential (refresh token, calendar, timezone)
//!    from the secret named `prefix + email`
//! 3. Exchange the refresh token for a short-lived access token
//! 4. Fetch busy intervals from the events endpoint, following the page
//!    cursor under a hard four-page cap
//! 5. Merge the busy time and slice the free gaps into fixed-length slots
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use freeslot_providers::google::{GoogleAvailabilityProvider, GoogleConfig};
//! use freeslot_providers::secrets::EnvSecretSource;
//!
//! let config = GoogleConfig::new("calendar/client", "calendar/user/");
//! let provider = GoogleAvailabilityProvider::new(config, Arc::new(EnvSecretSource::new()))?;
//!
//! let slots = provider.get_free_slots("alice@example.com", window, 30).await?;
//! ```

mod client;
mod config;
mod oauth;
mod provider;

pub use client::{BODY_LOG_LIMIT, BusyFetch, EventsClient, MAX_EVENT_PAGES, MAX_RESULTS_PER_PAGE};
pub use config::{
    CLIENT_SECRET_NAME_VAR, DEFAULT_EVENTS_BASE_URL, DEFAULT_TOKEN_URL, ERROR_SNIPPET_LIMIT,
    GoogleConfig, USER_SECRET_PREFIX_VAR,
};
pub use oauth::TokenExchanger;
pub use provider::{GoogleAvailabilityProvider, PROVIDER_NAME};
