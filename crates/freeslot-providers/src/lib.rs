//! AvailabilityProvider trait, registry and implementations.
//!
//! This crate provides the availability-resolution layer on top of
//! `freeslot-core`:
//!
//! - [`AvailabilityProvider`] - The one-capability trait all backends implement
//! - [`ProviderRegistry`] - Name-to-constructor lookup for provider selection
//! - [`SecretSource`] - Injected collaborator supplying credential blobs
//! - [`ProviderError`] - Error taxonomy for the whole pipeline
//! - [`google`] - The Google Calendar implementation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ ProviderRegistry │  name → constructor
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────────────────┐      ┌──────────────┐
//! │ GoogleAvailabilityProvider   │◄─────│ SecretSource │
//! └────────┬─────────────────────┘      └──────────────┘
//!          │ resolve credentials → exchange token → fetch pages
//!          ▼
//! ┌──────────────────┐
//! │ freeslot-core    │  clip → merge → gaps → slots
//! └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use freeslot_providers::{EnvSecretSource, ProviderRegistry};
//!
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.create_from_env(Arc::new(EnvSecretSource::new()))?;
//! let slots = provider.get_free_slots("alice@example.com", window, 30).await?;
//! ```

pub mod credentials;
pub mod error;
pub mod google;
pub mod provider;
pub mod registry;
pub mod secrets;

// Re-export main types at crate root
pub use credentials::{ClientCredential, DEFAULT_CALENDAR_ID, UserCredential};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::{AvailabilityProvider, BoxFuture};
pub use registry::{DEFAULT_PROVIDER, PROVIDER_ENV_VAR, ProviderRegistry};
pub use secrets::{EnvSecretSource, SecretSource};
