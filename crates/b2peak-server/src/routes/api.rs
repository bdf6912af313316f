//! JSON API: `/v1/session`, `/v1/nfts`, `/v1/dashboard`
//!
//! Mirrors what the pages show, for scripted clients. The same client
//! session cookie applies, so a login started here is visible on the pages
//! and vice versa.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};

use b2peak_core::catalog::{CategoryFilter, MarketplaceQuery, NftDetail, NftSummary};
use b2peak_core::dashboard::{Dashboard, Gate, dashboard_for};
use b2peak_core::identity::LoginKind;
use b2peak_core::session::Session;
use b2peak_core::verification::VerificationStatus;

use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Build the `/v1/session` router.
pub fn session_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_session))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Build the `/v1/nfts` router.
pub fn nft_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_nfts))
        .route("/{id}", get(get_nft))
        .route(
            "/{id}/verification",
            get(get_verification).post(start_verification),
        )
}

/// Build the `/v1/dashboard` router.
pub fn dashboard_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_dashboard))
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub kind: String,
    /// Block until the attempt resolves instead of answering 202.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NftListResponse {
    pub count: usize,
    pub items: Vec<NftSummary>,
}

#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub nft_id: String,
    /// `None` until verification has been started for this client.
    pub status: Option<VerificationStatus>,
}

// ── Session ──────────────────────────────────────────────────────────

async fn get_session(Extension(session): CurrentSession) -> Json<Session> {
    Json(session.store().snapshot())
}

/// Start a login. Answers 202 with the pending snapshot, or with `wait`
/// set, 200 with the settled snapshot (or the failure as an error).
async fn login(
    Extension(session): CurrentSession,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let kind: LoginKind = body.kind.parse()?;
    session.store().login(kind);

    if !body.wait {
        return Ok((StatusCode::ACCEPTED, Json(session.store().snapshot())));
    }

    let settled = session.store().settled().await;
    if let Some(failure) = settled.failure() {
        return Err(failure.clone().into());
    }
    Ok((StatusCode::OK, Json(settled)))
}

async fn logout(Extension(session): CurrentSession) -> Json<Session> {
    session.store().logout();
    Json(session.store().snapshot())
}

// ── NFTs ─────────────────────────────────────────────────────────────

/// Filtered listing. Unlike the page, an unknown category is a 400.
async fn list_nfts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<NftListResponse>, AppError> {
    let category: CategoryFilter = params.category.as_deref().unwrap_or("all").parse()?;
    let query = MarketplaceQuery::new(params.search.unwrap_or_default().trim(), category);
    let items = state.catalog.list_nfts(&query).await?;
    Ok(Json(NftListResponse {
        count: items.len(),
        items,
    }))
}

async fn get_nft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NftDetail>, AppError> {
    Ok(Json(state.catalog.get_nft(&id).await?))
}

async fn get_verification(
    State(state): State<Arc<AppState>>,
    Extension(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<VerificationResponse>, AppError> {
    state.catalog.get_nft(&id).await?;
    let status = session.verifications().status(&id);
    Ok(Json(VerificationResponse { nft_id: id, status }))
}

async fn start_verification(
    State(state): State<Arc<AppState>>,
    Extension(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<VerificationResponse>), AppError> {
    state.catalog.get_nft(&id).await?;
    let status = session.verifications().start(&id, &state.verifier);
    Ok((
        StatusCode::ACCEPTED,
        Json(VerificationResponse {
            nft_id: id,
            status: Some(status),
        }),
    ))
}

// ── Dashboard ────────────────────────────────────────────────────────

async fn get_dashboard(Extension(session): CurrentSession) -> Result<Json<Dashboard>, AppError> {
    match dashboard_for(session.store().snapshot().identity()) {
        Gate::Granted(dashboard) => Ok(Json(dashboard)),
        Gate::Denied => Err(AppError::Unauthorized(
            "sign in to access the dashboard".to_owned(),
        )),
    }
}
