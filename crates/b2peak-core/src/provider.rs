//! Identity provider boundary.
//!
//! The session store never fabricates identities itself; it asks an
//! [`IdentityProvider`]. Today the only implementation is
//! [`FixtureIdentityProvider`], which waits a fixed latency and hands back a
//! hardcoded identity. A wallet-signature or SSO provider slots in behind the
//! same trait without touching the session contract.

use std::time::Duration;

use crate::error::AuthError;
use crate::identity::{self, Identity, LoginKind};

/// Resolves a login request into an authenticated identity.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Authenticate the caller for the given login kind.
    ///
    /// A successful result must be an authenticated variant; the session
    /// store treats [`Identity::Anonymous`] as an invalid credential.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the credential is rejected or the
    /// provider cannot be reached.
    async fn authenticate(&self, kind: LoginKind) -> Result<Identity, AuthError>;
}

/// Stub provider: sleeps `latency`, then returns the fixture for the kind.
#[derive(Debug, Clone)]
pub struct FixtureIdentityProvider {
    latency: Duration,
}

impl FixtureIdentityProvider {
    /// Simulated handshake latency used when none is configured.
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for FixtureIdentityProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn authenticate(&self, kind: LoginKind) -> Result<Identity, AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        tracing::debug!(%kind, "fixture identity issued");
        Ok(identity::fixture_for(kind))
    }
}
