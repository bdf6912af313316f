//! Per-client sessions.
//!
//! Each browser (or API client) gets its own [`ClientSession`], keyed by the
//! id carried in the `b2peak_session` cookie. A client session owns a
//! [`SessionStore`], the client's liked NFTs, and its verification board.
//! Evicting a client session drops all three, which aborts any login or
//! verification still in flight for it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use b2peak_core::provider::IdentityProvider;
use b2peak_core::session::SessionStore;
use b2peak_core::verification::VerificationBoard;

/// State belonging to one client.
pub struct ClientSession {
    id: Uuid,
    store: SessionStore,
    verifications: VerificationBoard,
    liked: Mutex<HashSet<String>>,
    last_seen: Mutex<Instant>,
}

impl ClientSession {
    fn new(id: Uuid, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            id,
            store: SessionStore::new(provider),
            verifications: VerificationBoard::new(),
            liked: Mutex::new(HashSet::new()),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub const fn verifications(&self) -> &VerificationBoard {
        &self.verifications
    }

    #[must_use]
    pub fn is_liked(&self, nft_id: &str) -> bool {
        self.liked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(nft_id)
    }

    /// Flip the like flag for `nft_id`; returns whether it is now liked.
    pub fn toggle_like(&self, nft_id: &str) -> bool {
        let mut liked = self.liked.lock().unwrap_or_else(PoisonError::into_inner);
        if liked.remove(nft_id) {
            false
        } else {
            liked.insert(nft_id.to_owned());
            true
        }
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let last_seen = *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last_seen)
    }
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("id", &self.id)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// All live client sessions.
pub struct SessionRegistry {
    provider: Arc<dyn IdentityProvider>,
    sessions: RwLock<HashMap<Uuid, Arc<ClientSession>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the session for `id`, creating a fresh one when the id is
    /// absent or unknown. The boolean is `true` when a session was created,
    /// in which case the caller must hand the new id back to the client.
    pub async fn resolve(&self, id: Option<Uuid>) -> (Arc<ClientSession>, bool) {
        if let Some(id) = id {
            if let Some(session) = self.sessions.read().await.get(&id) {
                session.touch();
                return (Arc::clone(session), false);
            }
        }

        let id = Uuid::new_v4();
        let session = Arc::new(ClientSession::new(id, Arc::clone(&self.provider)));
        self.sessions.write().await.insert(id, Arc::clone(&session));
        debug!(session_id = %id, "client session created");
        (session, true)
    }

    /// Evict every session idle for longer than `max_idle`. Returns how many
    /// were evicted.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) <= max_idle);
        let evicted = before.saturating_sub(sessions.len());
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "idle client sessions evicted");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use b2peak_core::identity::LoginKind;
    use b2peak_core::provider::FixtureIdentityProvider;

    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(FixtureIdentityProvider::new(
            Duration::from_secs(1),
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_id_creates_a_new_session() {
        let registry = registry();
        let (first, created) = registry.resolve(None).await;
        assert!(created);

        let (again, created) = registry.resolve(Some(first.id())).await;
        assert!(!created);
        assert_eq!(again.id(), first.id());

        let (other, created) = registry.resolve(Some(Uuid::new_v4())).await;
        assert!(created);
        assert_ne!(other.id(), first.id());
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn likes_toggle_per_session() {
        let registry = registry();
        let (a, _) = registry.resolve(None).await;
        let (b, _) = registry.resolve(None).await;

        assert!(a.toggle_like("1"));
        assert!(a.is_liked("1"));
        assert!(!b.is_liked("1"));
        assert!(!a.toggle_like("1"));
        assert!(!a.is_liked("1"));
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_idle_sessions() {
        let registry = registry();
        let (stale, _) = registry.resolve(None).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        let (fresh, _) = registry.resolve(None).await;
        tokio::time::advance(Duration::from_secs(20)).await;

        let evicted = registry.sweep_idle(Duration::from_secs(60)).await;
        assert_eq!(evicted, 1);
        assert_eq!(registry.len().await, 1);

        let (_, created) = registry.resolve(Some(stale.id())).await;
        assert!(created);
        let (_, created) = registry.resolve(Some(fresh.id())).await;
        assert!(!created);
    }

    #[tokio::test(start_paused = true)]
    async fn eviction_aborts_inflight_login() {
        let registry = SessionRegistry::new(Arc::new(FixtureIdentityProvider::new(
            Duration::from_secs(60),
        )));
        let (session, _) = registry.resolve(None).await;
        let mut rx = session.store().subscribe();
        session.store().login(LoginKind::Wallet);
        drop(session);

        tokio::time::advance(Duration::from_secs(10)).await;
        registry.sweep_idle(Duration::from_secs(5)).await;
        assert!(registry.is_empty().await);

        // The store is gone with its sender, so the receiver sees closure
        // and never a resolved identity.
        let _ = rx.borrow_and_update();
        assert!(rx.changed().await.is_err());
        assert!(!rx.borrow().is_authenticated());
    }
}
