//! NFT verification and verification codes.
//!
//! [`VerificationService`] is the boundary a real on-chain verifier and QR
//! generator would implement. [`FixtureVerifier`] waits a fixed latency and
//! always reports `verified`; its verification code is a placeholder SVG.
//!
//! [`VerificationBoard`] tracks the per-client tri-state status of each NFT
//! the client has looked at, running the service on spawned tasks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Tri-state verification status shown on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Failed { reason: String },
}

impl VerificationStatus {
    /// Button label for this status.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Verifying...",
            Self::Verified => "Verified",
            Self::Failed { .. } => "Failed",
        }
    }

    /// Why verification failed, if it did.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            Self::Pending | Self::Verified => None,
        }
    }
}

/// Outcome of a verification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub nft_id: String,
    pub status: VerificationStatus,
    pub checked_at: DateTime<Utc>,
}

/// An image that encodes a verification link for an NFT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Verifies NFTs and produces scannable verification codes.
#[async_trait::async_trait]
pub trait VerificationService: Send + Sync + 'static {
    /// Produce an image a verifier can scan to check `nft_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the code cannot be produced.
    async fn generate_verification_code(&self, nft_id: &str) -> Result<VerificationCode, FetchError>;

    /// Check the authenticity of `nft_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the verifier cannot be reached.
    async fn verify(&self, nft_id: &str) -> Result<VerificationResult, FetchError>;
}

/// Stub verifier: always verified after a fixed latency.
#[derive(Debug, Clone)]
pub struct FixtureVerifier {
    latency: Duration,
}

impl FixtureVerifier {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for FixtureVerifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

#[async_trait::async_trait]
impl VerificationService for FixtureVerifier {
    async fn generate_verification_code(&self, nft_id: &str) -> Result<VerificationCode, FetchError> {
        Ok(VerificationCode {
            content_type: "image/svg+xml",
            body: placeholder_code_svg(nft_id).into_bytes(),
        })
    }

    async fn verify(&self, nft_id: &str) -> Result<VerificationResult, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(VerificationResult {
            nft_id: nft_id.to_owned(),
            status: VerificationStatus::Verified,
            checked_at: Utc::now(),
        })
    }
}

/// White 192x192 tile with a caption; stands in for a real QR code.
fn placeholder_code_svg(nft_id: &str) -> String {
    let id: String = nft_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(32)
        .collect();
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="192" height="192" viewBox="0 0 192 192"><rect width="192" height="192" rx="12" fill="#ffffff"/><text x="96" y="92" font-family="sans-serif" font-size="14" text-anchor="middle" fill="#0f172a">QR Code Here</text><text x="96" y="114" font-family="monospace" font-size="11" text-anchor="middle" fill="#64748b">nft/{id}</text></svg>"##
    )
}

#[derive(Default)]
struct BoardState {
    statuses: HashMap<String, VerificationStatus>,
    runs: HashMap<String, Run>,
    next_generation: u64,
}

/// The in-flight verification for one NFT. Only the run whose generation
/// is current may write a status.
struct Run {
    generation: u64,
    task: JoinHandle<()>,
}

/// Per-client verification status of each NFT, driven by spawned tasks.
#[derive(Default)]
pub struct VerificationBoard {
    state: Arc<Mutex<BoardState>>,
}

impl VerificationBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status for `nft_id`, or `None` if never started.
    #[must_use]
    pub fn status(&self, nft_id: &str) -> Option<VerificationStatus> {
        lock(&self.state).statuses.get(nft_id).cloned()
    }

    /// Start verification unless it has already been started for `nft_id`.
    ///
    /// Returns the status after the call.
    pub fn ensure_started(
        &self,
        nft_id: &str,
        service: &Arc<dyn VerificationService>,
    ) -> VerificationStatus {
        if let Some(status) = self.status(nft_id) {
            return status;
        }
        self.start(nft_id, service)
    }

    /// (Re)start verification for `nft_id`. The status is pending on return.
    ///
    /// A previous run for the same NFT is aborted, and a result it already
    /// produced is discarded. Must be called from within a tokio runtime.
    pub fn start(
        &self,
        nft_id: &str,
        service: &Arc<dyn VerificationService>,
    ) -> VerificationStatus {
        let mut state = lock(&self.state);
        state.next_generation = state.next_generation.wrapping_add(1);
        let generation = state.next_generation;
        state
            .statuses
            .insert(nft_id.to_owned(), VerificationStatus::Pending);

        let board = Arc::downgrade(&self.state);
        let service = Arc::clone(service);
        let id = nft_id.to_owned();
        let task = tokio::spawn(async move {
            let status = match service.verify(&id).await {
                Ok(result) => result.status,
                Err(err) => {
                    warn!(nft_id = %id, error = %err, "verification failed");
                    VerificationStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            if let Some(board) = board.upgrade() {
                resolve(&board, &id, generation, status);
            }
        });

        // The lock is still held, so the task cannot resolve before its run
        // is registered.
        if let Some(previous) = state
            .runs
            .insert(nft_id.to_owned(), Run { generation, task })
        {
            previous.task.abort();
        }
        VerificationStatus::Pending
    }
}

/// Apply `status` if `generation` is still the current run for `nft_id`.
fn resolve(
    board: &Mutex<BoardState>,
    nft_id: &str,
    generation: u64,
    status: VerificationStatus,
) -> bool {
    let mut state = lock(board);
    let current = state
        .runs
        .get(nft_id)
        .is_some_and(|run| run.generation == generation);
    if !current {
        debug!(nft_id, generation, "discarding superseded verification result");
        return false;
    }
    state.runs.remove(nft_id);
    debug!(nft_id, status = status.label(), "verification resolved");
    state.statuses.insert(nft_id.to_owned(), status);
    true
}

impl Drop for VerificationBoard {
    fn drop(&mut self) {
        for (_, run) in lock(&self.state).runs.drain() {
            run.task.abort();
        }
    }
}

impl std::fmt::Debug for VerificationBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationBoard")
            .field("statuses", &lock(&self.state).statuses)
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<BoardState>) -> std::sync::MutexGuard<'_, BoardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(latency: Duration) -> Arc<dyn VerificationService> {
        Arc::new(FixtureVerifier::new(latency))
    }

    struct BrokenVerifier;

    #[async_trait::async_trait]
    impl VerificationService for BrokenVerifier {
        async fn generate_verification_code(
            &self,
            nft_id: &str,
        ) -> Result<VerificationCode, FetchError> {
            Err(FetchError::NotFound {
                id: nft_id.to_owned(),
            })
        }

        async fn verify(&self, _nft_id: &str) -> Result<VerificationResult, FetchError> {
            Err(FetchError::Network {
                reason: "rpc timeout".to_owned(),
            })
        }
    }

    async fn wait_until_settled(board: &VerificationBoard, nft_id: &str) -> VerificationStatus {
        loop {
            match board.status(nft_id) {
                Some(VerificationStatus::Pending) | None => {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                Some(status) => return status,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fixture_verifier_always_verifies() {
        let verifier = FixtureVerifier::new(Duration::from_secs(2));
        let result = verifier.verify("1").await.unwrap();
        assert_eq!(result.status, VerificationStatus::Verified);
        assert_eq!(result.nft_id, "1");
    }

    #[tokio::test]
    async fn verification_code_is_placeholder_svg() {
        let code = FixtureVerifier::default()
            .generate_verification_code("42")
            .await
            .unwrap();
        assert_eq!(code.content_type, "image/svg+xml");
        let svg = String::from_utf8(code.body).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("QR Code Here"));
        assert!(svg.contains("nft/42"));
    }

    #[test]
    fn placeholder_strips_markup_from_id() {
        let svg = placeholder_code_svg("<script>1</script>");
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("nft/script1script"));
    }

    #[tokio::test(start_paused = true)]
    async fn board_goes_pending_then_verified() {
        let board = VerificationBoard::new();
        assert_eq!(board.status("1"), None);

        let status = board.start("1", &service(Duration::from_secs(2)));
        assert_eq!(status, VerificationStatus::Pending);
        assert_eq!(board.status("1"), Some(VerificationStatus::Pending));

        let settled = wait_until_settled(&board, "1").await;
        assert_eq!(settled, VerificationStatus::Verified);
    }

    #[tokio::test(start_paused = true)]
    async fn ensure_started_does_not_restart_settled_verification() {
        let board = VerificationBoard::new();
        let svc = service(Duration::from_millis(100));
        board.ensure_started("3", &svc);
        wait_until_settled(&board, "3").await;

        assert_eq!(
            board.ensure_started("3", &svc),
            VerificationStatus::Verified
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restart_sets_pending_again() {
        let board = VerificationBoard::new();
        let svc = service(Duration::from_millis(100));
        board.start("2", &svc);
        wait_until_settled(&board, "2").await;

        assert_eq!(board.start("2", &svc), VerificationStatus::Pending);
        assert_eq!(board.status("2"), Some(VerificationStatus::Pending));
    }

    #[tokio::test(start_paused = true)]
    async fn service_error_becomes_failed_status() {
        let board = VerificationBoard::new();
        let svc: Arc<dyn VerificationService> = Arc::new(BrokenVerifier);
        board.start("5", &svc);

        let settled = wait_until_settled(&board, "5").await;
        assert!(matches!(settled, VerificationStatus::Failed { reason } if reason.contains("rpc timeout")));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_result_cannot_overwrite_a_restart() {
        let board = VerificationBoard::new();
        let svc = service(Duration::from_secs(60));
        board.start("1", &svc);
        let first = lock(&board.state).runs["1"].generation;

        board.start("1", &svc);
        let second = lock(&board.state).runs["1"].generation;
        assert_ne!(first, second);

        // A first run that got past `verify` before the restart aborted it.
        assert!(!resolve(&board.state, "1", first, VerificationStatus::Verified));
        assert_eq!(board.status("1"), Some(VerificationStatus::Pending));
        assert!(lock(&board.state).runs.contains_key("1"));

        assert!(resolve(&board.state, "1", second, VerificationStatus::Verified));
        assert_eq!(board.status("1"), Some(VerificationStatus::Verified));
        assert!(lock(&board.state).runs.is_empty());
    }

    #[test]
    fn only_failed_status_has_a_reason() {
        let failed = VerificationStatus::Failed {
            reason: "rpc timeout".to_owned(),
        };
        assert_eq!(failed.failure_reason(), Some("rpc timeout"));
        assert_eq!(VerificationStatus::Pending.failure_reason(), None);
        assert_eq!(VerificationStatus::Verified.failure_reason(), None);
    }
}
