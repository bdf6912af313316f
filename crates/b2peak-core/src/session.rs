//! Session store: the single source of truth for "who is signed in".
//!
//! A [`SessionStore`] owns one [`Session`] snapshot inside a `watch`
//! channel. Every change is broadcast to subscribers, which is how pages
//! and the navigation shell learn about login results.
//!
//! # Login lifecycle
//!
//! 1. [`SessionStore::login`] marks the session pending synchronously and
//!    takes a new ticket.
//! 2. A spawned task asks the [`IdentityProvider`] to authenticate.
//! 3. The result is applied only if its ticket is still the newest one.
//!
//! Overlapping logins therefore resolve last-call-wins: a newer login aborts
//! the older attempt and invalidates its ticket, so a slow first attempt can
//! never overwrite a faster second one. Ticket comparison happens inside the
//! channel's write lock, which totally orders competing updates.
//!
//! Dropping the store aborts any attempt still in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::identity::{Identity, LoginKind};
use crate::provider::IdentityProvider;

/// Where the session stands with respect to authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthStatus {
    /// No attempt in flight.
    #[default]
    Idle,
    /// An attempt is waiting on the provider.
    Pending,
    /// The most recent attempt failed; the identity was left as it was.
    Failed { reason: AuthError },
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    identity: Identity,
    status: AuthStatus,
}

impl Session {
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn status(&self) -> &AuthStatus {
        &self.status
    }

    /// True strictly while an authentication attempt is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, AuthStatus::Pending)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    /// Reason the last attempt failed, if it did.
    #[must_use]
    pub const fn failure(&self) -> Option<&AuthError> {
        match &self.status {
            AuthStatus::Failed { reason } => Some(reason),
            AuthStatus::Idle | AuthStatus::Pending => None,
        }
    }
}

/// Identifies one login attempt. Only the newest ticket may resolve.
pub type LoginTicket = u64;

struct Shared {
    state: watch::Sender<Session>,
    latest: AtomicU64,
}

impl Shared {
    fn resolve(&self, ticket: LoginTicket, kind: LoginKind, outcome: Result<Identity, AuthError>) {
        let outcome = match outcome {
            Ok(Identity::Anonymous) => Err(AuthError::InvalidCredential {
                reason: "provider returned an anonymous identity".to_owned(),
            }),
            other => other,
        };

        let applied = self.state.send_if_modified(|session| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                return false;
            }
            match outcome {
                Ok(identity) => {
                    info!(%kind, identity = identity.kind(), ticket, "login resolved");
                    session.identity = identity;
                    session.status = AuthStatus::Idle;
                }
                Err(reason) => {
                    warn!(%kind, error = %reason, ticket, "login failed");
                    session.status = AuthStatus::Failed { reason };
                }
            }
            true
        });

        if !applied {
            debug!(%kind, ticket, "discarding superseded login result");
        }
    }
}

/// Holds the current identity and in-flight authentication status.
pub struct SessionStore {
    shared: Arc<Shared>,
    provider: Arc<dyn IdentityProvider>,
    inflight: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Create an unauthenticated, idle session backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            shared: Arc::new(Shared {
                state,
                latest: AtomicU64::new(0),
            }),
            provider,
            inflight: Mutex::new(None),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.shared.state.borrow().clone()
    }

    /// Receive every subsequent change to the session.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.shared.state.subscribe()
    }

    /// Start a login attempt.
    ///
    /// The session is pending as soon as this returns. The provider runs on
    /// a spawned task; any earlier attempt still in flight is aborted and its
    /// result will never be applied. May be called while authenticated, in
    /// which case a successful attempt replaces the identity.
    ///
    /// Must be called from within a tokio runtime.
    pub fn login(&self, kind: LoginKind) -> LoginTicket {
        let mut ticket = 0;
        self.shared.state.send_modify(|session| {
            ticket = self.shared.latest.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
            session.status = AuthStatus::Pending;
        });
        debug!(%kind, ticket, "login started");

        let shared = Arc::clone(&self.shared);
        let provider = Arc::clone(&self.provider);
        let handle = tokio::spawn(async move {
            let outcome = provider.authenticate(kind).await;
            shared.resolve(ticket, kind, outcome);
        });

        let superseded = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = superseded {
            previous.abort();
        }

        ticket
    }

    /// Sign out. Clears the identity and leaves the pending flag alone.
    ///
    /// An attempt that is still in flight keeps running and will apply its
    /// result when it resolves.
    pub fn logout(&self) {
        self.shared.state.send_modify(|session| {
            if session.identity.is_authenticated() {
                info!(identity = session.identity.kind(), "logout");
            }
            session.identity = Identity::Anonymous;
        });
    }

    /// Wait until no attempt is in flight and return that snapshot.
    pub async fn settled(&self) -> Session {
        let mut rx = self.subscribe();
        match rx.wait_for(|session| !session.is_pending()).await {
            Ok(session) => session.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        let inflight = self
            .inflight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = inflight {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.shared.state.borrow())
            .finish_non_exhaustive()
    }
}
