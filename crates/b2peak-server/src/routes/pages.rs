//! HTML pages: `/`, `/marketplace`, `/dashboard`, `/nft/{id}`.
//!
//! Also hosts the NFT page actions (like, verify, QR image) and the HTML
//! not-found fallback.

use std::sync::Arc;

use axum::{Extension, Router};
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tracing::{debug, warn};

use b2peak_core::catalog::{CategoryFilter, MarketplaceQuery, ViewMode};
use b2peak_core::dashboard::{DashboardTab, Gate, dashboard_for};
use b2peak_core::error::FetchError;
use b2peak_core::verification::VerificationStatus;

use crate::middleware::CurrentSession;
use crate::routes::chrome_for;
use crate::session::ClientSession;
use crate::state::AppState;
use crate::views::{self, dashboard, detail, landing, marketplace, not_found};

/// Build the HTML page router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing_page))
        .route("/marketplace", get(marketplace_page))
        .route("/dashboard", get(dashboard_page))
        .route("/nft/{id}", get(nft_page))
        .route("/nft/{id}/like", post(toggle_like))
        .route("/nft/{id}/verify", post(restart_verification))
        .route("/nft/{id}/qr", get(verification_code))
}

// ── Query types ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct MarketplaceParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub tab: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub qr: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn landing_page(Extension(session): CurrentSession, uri: Uri) -> Response {
    let chrome = chrome_for(&session, "Home", &uri, false);
    views::render(landing::render(&chrome)).into_response()
}

/// Marketplace listing. Unknown category or view values fall back to the
/// defaults rather than failing the page.
async fn marketplace_page(
    State(state): State<Arc<AppState>>,
    Extension(session): CurrentSession,
    Query(params): Query<MarketplaceParams>,
    uri: Uri,
) -> Response {
    let category = parse_or_default::<CategoryFilter>(params.category.as_deref());
    let view = parse_or_default::<ViewMode>(params.view.as_deref());
    let query = MarketplaceQuery::new(params.search.unwrap_or_default().trim(), category);

    let chrome = chrome_for(&session, "Marketplace", &uri, false);
    match state.catalog.list_nfts(&query).await {
        Ok(items) => views::render(marketplace::render(&chrome, &query, view, &items)).into_response(),
        Err(e) => unavailable_page(&chrome, &e),
    }
}

/// Gated dashboard. Anonymous visitors get the access-denied view with a
/// 200 status and no dashboard data.
async fn dashboard_page(
    Extension(session): CurrentSession,
    Query(params): Query<DashboardParams>,
    uri: Uri,
) -> Response {
    let chrome = chrome_for(&session, "Dashboard", &uri, false);
    let identity = session.store().snapshot().identity().clone();

    match dashboard_for(&identity) {
        Gate::Denied => views::render(dashboard::render_denied(&chrome)).into_response(),
        Gate::Granted(board) => {
            let tab = parse_or_default::<DashboardTab>(params.tab.as_deref());
            views::render(dashboard::render(&chrome, &board, tab)).into_response()
        }
    }
}

/// NFT detail. Verification starts on the first visit from this client.
async fn nft_page(
    State(state): State<Arc<AppState>>,
    Extension(session): CurrentSession,
    Path(id): Path<String>,
    Query(params): Query<DetailParams>,
    uri: Uri,
) -> Response {
    let nft = match state.catalog.get_nft(&id).await {
        Ok(nft) => nft,
        Err(e) => return fetch_error_page(&session, &uri, &id, &e),
    };

    let verification = session.verifications().ensure_started(&id, &state.verifier);
    let pending = verification == VerificationStatus::Pending;
    let detail_state = detail::DetailState {
        liked: session.is_liked(&id),
        verification,
        show_qr: params.qr.as_deref().is_some_and(|v| v == "1" || v == "true"),
    };

    let chrome = chrome_for(&session, &nft.summary.title, &uri, pending);
    views::render(detail::render(&chrome, &nft, &detail_state)).into_response()
}

async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Extension(session): CurrentSession,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    if let Err(e) = state.catalog.get_nft(&id).await {
        return fetch_error_page(&session, &uri, &id, &e);
    }
    let liked = session.toggle_like(&id);
    debug!(nft_id = %id, liked, "like toggled");
    Redirect::to(&format!("/nft/{id}")).into_response()
}

async fn restart_verification(
    State(state): State<Arc<AppState>>,
    Extension(session): CurrentSession,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    if let Err(e) = state.catalog.get_nft(&id).await {
        return fetch_error_page(&session, &uri, &id, &e);
    }
    session.verifications().start(&id, &state.verifier);
    Redirect::to(&format!("/nft/{id}")).into_response()
}

/// Placeholder verification code image for the QR modal.
async fn verification_code(
    State(state): State<Arc<AppState>>,
    Extension(session): CurrentSession,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    if let Err(e) = state.catalog.get_nft(&id).await {
        return fetch_error_page(&session, &uri, &id, &e);
    }
    match state.verifier.generate_verification_code(&id).await {
        Ok(code) => ([(CONTENT_TYPE, code.content_type)], code.body).into_response(),
        Err(e) => fetch_error_page(&session, &uri, &id, &e),
    }
}

/// HTML 404 for any path no route matches.
pub async fn fallback(Extension(session): CurrentSession, uri: Uri) -> Response {
    let chrome = chrome_for(&session, "Not Found", &uri, false);
    not_found_page(&chrome, "The page you are looking for does not exist.")
}

// ── Helpers ──────────────────────────────────────────────────────────

fn parse_or_default<T>(raw: Option<&str>) -> T
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => T::default(),
        Some(value) => value.parse().unwrap_or_else(|e| {
            debug!(error = %e, "ignoring invalid page parameter");
            T::default()
        }),
    }
}

/// HTML response for a failed NFT lookup: 404 for an unknown id, 503 when
/// the source is unreachable.
fn fetch_error_page(session: &ClientSession, uri: &Uri, id: &str, err: &FetchError) -> Response {
    match err {
        FetchError::NotFound { .. } => {
            let chrome = chrome_for(session, "Not Found", uri, false);
            not_found_page(&chrome, &format!("No NFT with id '{id}' exists."))
        }
        FetchError::Network { .. } => {
            let chrome = chrome_for(session, "Unavailable", uri, false);
            unavailable_page(&chrome, err)
        }
    }
}

fn not_found_page(chrome: &views::Chrome, message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        views::render(not_found::render(chrome, message)),
    )
        .into_response()
}

fn unavailable_page(chrome: &views::Chrome, err: &FetchError) -> Response {
    warn!(error = %err, "nft source unavailable");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        views::render(not_found::render(
            chrome,
            "NFT data is temporarily unavailable. Please try again shortly.",
        )),
    )
        .into_response()
}
