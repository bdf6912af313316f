//! Shared application state for `B2Peak` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the client session registry and the
//! collaborators every page and API call reads from.

use std::sync::Arc;

use b2peak_core::catalog::{FixtureCatalog, NftSource};
use b2peak_core::provider::{FixtureIdentityProvider, IdentityProvider};
use b2peak_core::retry::RetryingSource;
use b2peak_core::verification::{FixtureVerifier, VerificationService};

use crate::config::ServerConfig;
use crate::session::SessionRegistry;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Effective server configuration.
    pub config: ServerConfig,
    /// Live client sessions keyed by cookie id.
    pub sessions: SessionRegistry,
    /// NFT listings and detail records.
    pub catalog: Arc<dyn NftSource>,
    /// Verification and verification-code generation.
    pub verifier: Arc<dyn VerificationService>,
}

impl AppState {
    /// Wire the fixture collaborators with the latencies from `config`.
    #[must_use]
    pub fn from_config(config: ServerConfig) -> Self {
        let provider = Arc::new(FixtureIdentityProvider::new(config.login_latency));
        let catalog =
            Arc::new(RetryingSource::new(FixtureCatalog::new()).with_retries(config.fetch_retries));
        let verifier = Arc::new(FixtureVerifier::new(config.verify_latency));
        Self::with_collaborators(config, provider, catalog, verifier)
    }

    /// Build state around explicit collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: ServerConfig,
        provider: Arc<dyn IdentityProvider>,
        catalog: Arc<dyn NftSource>,
        verifier: Arc<dyn VerificationService>,
    ) -> Self {
        Self {
            config,
            sessions: SessionRegistry::new(provider),
            catalog,
            verifier,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
