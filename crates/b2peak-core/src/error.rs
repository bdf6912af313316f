//! Error types for `b2peak-core`.
//!
//! Each collaborator boundary has its own error enum so callers can decide
//! per variant whether to retry, display, or give up. Errors are `Clone`
//! because they end up inside session and verification snapshots that are
//! fanned out to every subscriber.

use serde::Serialize;

/// Errors from an identity provider while authenticating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AuthError {
    /// The provider rejected the presented credential.
    #[error("invalid credential: {reason}")]
    InvalidCredential { reason: String },

    /// The provider could not be reached or refused to answer.
    #[error("identity provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    /// The attempt was abandoned before the provider answered.
    #[error("authentication cancelled")]
    Cancelled,
}

/// Errors from NFT data and verification collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// No NFT exists with the requested identifier.
    #[error("nft '{id}' not found")]
    NotFound { id: String },

    /// The data source failed in a way that may succeed on retry.
    #[error("network error: {reason}")]
    Network { reason: String },
}

impl FetchError {
    /// Whether retrying the same call could plausibly succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Errors from parsing user-supplied selectors (login kind, category, tab).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown login kind '{0}', expected 'wallet' or 'organization'")]
    LoginKind(String),

    #[error("unknown category '{0}'")]
    Category(String),

    #[error("unknown dashboard tab '{0}'")]
    DashboardTab(String),

    #[error("unknown view mode '{0}', expected 'grid' or 'list'")]
    ViewMode(String),
}
