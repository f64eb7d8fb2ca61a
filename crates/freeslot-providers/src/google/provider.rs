//! Google availability provider implementation.
//!
//! This module implements the [`AvailabilityProvider`] trait for Google
//! Calendar: one linear pipeline per call, resolving credentials, exchanging
//! the refresh token and fetching busy time before handing off to the
//! interval algebra.

use std::sync::Arc;

use tracing::{debug, info};

use freeslot_core::{FreeSlot, TimeWindow, compute_free_slots};

use crate::credentials::{ClientCredential, UserCredential};
use crate::error::ProviderResult;
use crate::provider::{AvailabilityProvider, BoxFuture};
use crate::secrets::SecretSource;

use super::client::EventsClient;
use super::config::GoogleConfig;
use super::oauth::TokenExchanger;

/// Registry name of this provider.
pub const PROVIDER_NAME: &str = "google";

/// Google Calendar availability provider.
///
/// Holds configuration and an injected secret source; everything else is
/// created and consumed within a single `get_free_slots` invocation. No
/// token, credential or result survives across calls.
pub struct GoogleAvailabilityProvider {
    config: GoogleConfig,
    secrets: Arc<dyn SecretSource>,
    exchanger: TokenExchanger,
    events: EventsClient,
}

impl GoogleAvailabilityProvider {
    /// Creates a new provider with the given configuration and secret
    /// source.
    pub fn new(config: GoogleConfig, secrets: Arc<dyn SecretSource>) -> ProviderResult<Self> {
        config.validate()?;

        let exchanger = TokenExchanger::new(&config.token_url, config.timeout);
        let events = EventsClient::new(&config.events_base_url, config.timeout);

        Ok(Self {
            config,
            secrets,
            exchanger,
            events,
        })
    }

    async fn free_slots_impl(
        &self,
        email: &str,
        window: TimeWindow,
        slot_minutes: i64,
    ) -> ProviderResult<Vec<FreeSlot>> {
        info!(
            provider = PROVIDER_NAME,
            email,
            start = %window.start,
            end = %window.end,
            slot_minutes,
            "resolving free slots"
        );

        // Empty and inverted windows yield zero slots without touching the
        // secret store or the network.
        if window.is_empty() {
            debug!(provider = PROVIDER_NAME, email, "empty window, no slots");
            return Ok(Vec::new());
        }

        let client_credential =
            ClientCredential::resolve(self.secrets.as_ref(), &self.config.client_secret_name)
                .map_err(|e| e.with_provider(PROVIDER_NAME))?;
        let user_credential = UserCredential::resolve(
            self.secrets.as_ref(),
            &self.config.user_secret_prefix,
            email,
        )
        .map_err(|e| e.with_provider(PROVIDER_NAME))?;

        let access_token = self
            .exchanger
            .exchange(&client_credential, &user_credential.refresh_token)
            .await
            .map_err(|e| e.with_provider(PROVIDER_NAME))?;

        let fetch = self
            .events
            .fetch_busy_intervals(
                &access_token,
                &user_credential.calendar_id,
                &window,
                user_credential.time_zone.as_deref(),
            )
            .await
            .map_err(|e| e.with_provider(PROVIDER_NAME))?;

        let slots = compute_free_slots(&window, &fetch.intervals, slot_minutes);

        info!(
            provider = PROVIDER_NAME,
            email,
            busy = fetch.intervals.len(),
            events = fetch.events_seen,
            pages = fetch.pages_fetched,
            slots = slots.len(),
            "free slots resolved"
        );

        Ok(slots)
    }
}

impl AvailabilityProvider for GoogleAvailabilityProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn get_free_slots<'a>(
        &'a self,
        email: &'a str,
        window: TimeWindow,
        slot_minutes: i64,
    ) -> BoxFuture<'a, ProviderResult<Vec<FreeSlot>>> {
        Box::pin(async move { self.free_slots_impl(email, window, slot_minutes).await })
    }
}
