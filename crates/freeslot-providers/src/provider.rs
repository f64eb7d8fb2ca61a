//! AvailabilityProvider trait definition.
//!
//! This module defines the [`AvailabilityProvider`] trait, the single
//! capability every calendar backend exposes: given a person's email address
//! and a time window, produce the list of open meeting slots.
//!
//! Providers are responsible for resolving credentials, authenticating
//! against their calendar service and retrieving busy time; the slot
//! computation itself lives in `freeslot-core`.

use std::future::Future;
use std::pin::Pin;

use freeslot_core::{FreeSlot, TimeWindow};

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Using boxed futures keeps the trait object-safe, so providers can be
/// selected by name at runtime and handed around as `Box<dyn
/// AvailabilityProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core abstraction for availability backends.
///
/// Implementations run one self-contained pipeline per call: resolve
/// credentials, obtain an access token, fetch busy time, compute free slots.
/// Nothing survives across calls inside a provider; any caching belongs to
/// injected collaborators.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync` for use in async contexts
/// - An empty or inverted window yields `Ok` with zero slots, not an error
/// - Providers perform no internal retries; redelivery is the caller's policy
pub trait AvailabilityProvider: Send + Sync {
    /// Returns the name of this provider (e.g., "google").
    fn name(&self) -> &str;

    /// Computes the open `slot_minutes`-length slots for `email` within
    /// `window`.
    ///
    /// The result is chronological and recomputed fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ProviderError`] when credential resolution, token
    /// exchange or the busy-time fetch fails; a failure anywhere yields no
    /// partial slot list.
    fn get_free_slots<'a>(
        &'a self,
        email: &'a str,
        window: TimeWindow,
        slot_minutes: i64,
    ) -> BoxFuture<'a, ProviderResult<Vec<FreeSlot>>>;
}
