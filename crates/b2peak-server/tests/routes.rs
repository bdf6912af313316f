//! End-to-end tests for the HTTP surface.
//!
//! Each test builds the full router around zero-latency fixtures and drives
//! it in-process with `tower::ServiceExt::oneshot`, carrying the session
//! cookie between requests the way a browser would.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use b2peak_core::catalog::FixtureCatalog;
use b2peak_core::error::AuthError;
use b2peak_core::identity::{Identity, LoginKind};
use b2peak_core::provider::IdentityProvider;
use b2peak_core::verification::FixtureVerifier;
use b2peak_server::app::build_router;
use b2peak_server::config::ServerConfig;
use b2peak_server::state::AppState;

// ── Helpers ──────────────────────────────────────────────────────────

fn fast_config() -> ServerConfig {
    ServerConfig {
        login_latency: Duration::ZERO,
        verify_latency: Duration::ZERO,
        ..ServerConfig::default()
    }
}

fn app() -> Router {
    build_router(Arc::new(AppState::from_config(fast_config())))
}

async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// The `name=value` pair from the response's `Set-Cookie`.
fn session_cookie(resp: &Response<Body>) -> String {
    let raw = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set the session cookie")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_owned()
}

async fn text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json_body(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A fresh client: hit the landing page and keep the cookie it was given.
async fn new_client(app: &Router) -> String {
    let resp = send(app, get("/", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    session_cookie(&resp)
}

/// Poll the session API until no login is pending.
async fn wait_settled(app: &Router, cookie: &str) -> Value {
    for _ in 0..100 {
        let session = json_body(send(app, get("/v1/session", Some(cookie))).await).await;
        if session["status"]["state"] != "pending" {
            return session;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    unreachable!("login never settled")
}

// ── Pages ────────────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_dashboard_is_denied_without_data() {
    let app = app();
    let resp = send(&app, get("/dashboard", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(header::SET_COOKIE));

    let html = text(resp).await;
    assert!(html.contains("Access Denied"));
    assert!(html.contains("Please sign in to access the dashboard."));
    assert!(!html.contains("Total Campaigns"));
    assert!(!html.contains("href=\"/dashboard\""), "anonymous nav must not link the dashboard");
    assert!(html.contains("Connect Wallet"));
}

#[tokio::test]
async fn form_login_unlocks_the_dashboard() {
    let app = app();
    let cookie = new_client(&app).await;

    let resp = send(
        &app,
        post_form("/auth/login/organization", Some(&cookie), "return_to=%2Fdashboard"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/dashboard");
    assert!(!resp.headers().contains_key(header::SET_COOKIE));

    let session = wait_settled(&app, &cookie).await;
    assert_eq!(session["identity"]["kind"], "organization");

    let html = text(send(&app, get("/dashboard", Some(&cookie))).await).await;
    assert!(html.contains("Welcome back, John Doe"));
    assert!(html.contains("Tech University Dashboard"));
    assert!(html.contains("Total Campaigns"));
    assert!(!html.contains("Access Denied"));

    // Logout drops straight back to the denied view.
    let resp = send(&app, post_form("/auth/logout", Some(&cookie), "return_to=%2Fdashboard")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let html = text(send(&app, get("/dashboard", Some(&cookie))).await).await;
    assert!(html.contains("Access Denied"));
}

#[tokio::test]
async fn sessions_do_not_leak_between_clients() {
    let app = app();
    let alice = new_client(&app).await;
    let bob = new_client(&app).await;
    assert_ne!(alice, bob);

    let resp = send(
        &app,
        post_json("/v1/session/login", Some(&alice), &json!({ "kind": "wallet", "wait": true })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = text(send(&app, get("/dashboard", Some(&bob))).await).await;
    assert!(html.contains("Access Denied"));
}

#[tokio::test]
async fn foreign_return_targets_redirect_home() {
    let app = app();
    let cookie = new_client(&app).await;
    let resp = send(
        &app,
        post_form("/auth/login/wallet", Some(&cookie), "return_to=%2F%2Fevil.example"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn unknown_login_kind_is_rejected() {
    let app = app();
    let resp = send(&app, post_form("/auth/login/passkey", None, "")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn marketplace_filters_and_counts() {
    let app = app();
    let html = text(send(&app, get("/marketplace?search=diploma", None)).await).await;
    assert!(html.contains("1 NFTs found"));
    assert!(html.contains("Digital Diploma - Computer Science"));
    assert!(!html.contains("Championship Final Ticket"));

    // An unknown category falls back to everything on the page.
    let html = text(send(&app, get("/marketplace?category=art", None)).await).await;
    assert!(html.contains("6 NFTs found"));
}

#[tokio::test]
async fn nft_page_starts_verification_and_refreshes() {
    let app = app();
    let cookie = new_client(&app).await;

    let resp = send(&app, get("/nft/1", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = text(resp).await;
    assert!(html.contains("Digital Diploma - Computer Science"));
    assert!(html.contains("Verifying..."));
    assert!(html.contains("http-equiv=\"refresh\""));

    let mut verified = false;
    for _ in 0..100 {
        let status = json_body(send(&app, get("/v1/nfts/1/verification", Some(&cookie))).await).await;
        if status["status"]["state"] == "verified" {
            verified = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(verified);

    let html = text(send(&app, get("/nft/1", Some(&cookie))).await).await;
    assert!(html.contains("Verified"));
    assert!(!html.contains("http-equiv=\"refresh\""));
}

#[tokio::test]
async fn like_toggles_for_the_client() {
    let app = app();
    let cookie = new_client(&app).await;

    let resp = send(&app, post_form("/nft/3/like", Some(&cookie), "")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/nft/3");

    let html = text(send(&app, get("/nft/3", Some(&cookie))).await).await;
    assert!(html.contains("Liked"));

    send(&app, post_form("/nft/3/like", Some(&cookie), "")).await;
    let html = text(send(&app, get("/nft/3", Some(&cookie))).await).await;
    assert!(!html.contains("\u{2665} Liked"));
}

#[tokio::test]
async fn qr_modal_and_image() {
    let app = app();
    let html = text(send(&app, get("/nft/2?qr=1", None)).await).await;
    assert!(html.contains("Verification QR Code"));
    assert!(html.contains("src=\"/nft/2/qr\""));

    let resp = send(&app, get("/nft/2/qr", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/svg+xml");
    assert!(text(resp).await.contains("QR Code Here"));
}

#[tokio::test]
async fn unknown_pages_render_html_not_found() {
    let app = app();
    let resp = send(&app, get("/nft/999", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(text(resp).await.contains("Not Found"));

    let resp = send(&app, get("/no/such/page", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().contains_key(header::SET_COOKIE));
    assert!(text(resp).await.contains("Not Found"));
}

#[tokio::test]
async fn nft_actions_on_unknown_ids_render_html_not_found() {
    let app = app();
    let cookie = new_client(&app).await;

    for req in [
        post_form("/nft/999/like", Some(&cookie), ""),
        post_form("/nft/999/verify", Some(&cookie), ""),
        get("/nft/999/qr", Some(&cookie)),
    ] {
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_owned();
        assert!(content_type.starts_with("text/html"), "got {content_type}");
        let html = text(resp).await;
        assert!(html.contains("No NFT with id"));
        assert!(html.contains("999"));
    }
}

// ── JSON API ─────────────────────────────────────────────────────────

#[tokio::test]
async fn api_login_with_wait_returns_the_identity() {
    let app = app();
    let cookie = new_client(&app).await;

    let resp = send(
        &app,
        post_json("/v1/session/login", Some(&cookie), &json!({ "kind": "wallet", "wait": true })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session = json_body(resp).await;
    assert_eq!(session["identity"]["kind"], "individual_user");
    assert_eq!(session["identity"]["display_name"], "Alice Smith");
    assert_eq!(session["status"]["state"], "idle");

    let board = json_body(send(&app, get("/v1/dashboard", Some(&cookie))).await).await;
    assert_eq!(board["display_name"], "Alice Smith");

    let resp = send(&app, post_json("/v1/session/logout", Some(&cookie), &json!({}))).await;
    assert_eq!(json_body(resp).await["identity"]["kind"], "anonymous");
}

#[tokio::test]
async fn api_login_without_wait_is_accepted_pending() {
    let app = build_router(Arc::new(AppState::from_config(ServerConfig {
        login_latency: Duration::from_secs(60),
        ..fast_config()
    })));
    let cookie = new_client(&app).await;

    let resp = send(
        &app,
        post_json("/v1/session/login", Some(&cookie), &json!({ "kind": "organization" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(json_body(resp).await["status"]["state"], "pending");
}

struct RejectingProvider;

#[async_trait::async_trait]
impl IdentityProvider for RejectingProvider {
    async fn authenticate(&self, _kind: LoginKind) -> Result<Identity, AuthError> {
        Err(AuthError::InvalidCredential {
            reason: "signature mismatch".to_owned(),
        })
    }
}

#[tokio::test]
async fn rejected_login_surfaces_as_unauthorized() {
    let state = AppState::with_collaborators(
        fast_config(),
        Arc::new(RejectingProvider),
        Arc::new(FixtureCatalog::new()),
        Arc::new(FixtureVerifier::new(Duration::ZERO)),
    );
    let app = build_router(Arc::new(state));
    let cookie = new_client(&app).await;

    let resp = send(
        &app,
        post_json("/v1/session/login", Some(&cookie), &json!({ "kind": "wallet", "wait": true })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "unauthorized");

    let html = text(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("Sign-in failed"));
}

#[tokio::test]
async fn api_dashboard_requires_sign_in() {
    let app = app();
    let resp = send(&app, get("/v1/dashboard", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "unauthorized");
}

#[tokio::test]
async fn api_lists_and_fetches_nfts() {
    let app = app();
    let listing = json_body(send(&app, get("/v1/nfts?search=diploma", None)).await).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["items"][0]["title"], "Digital Diploma - Computer Science");

    let listing = json_body(send(&app, get("/v1/nfts?category=tickets", None)).await).await;
    assert_eq!(listing["count"], 2);
    let ids: Vec<&str> = listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["2", "4"]);

    let resp = send(&app, get("/v1/nfts?category=art", None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let detail = json_body(send(&app, get("/v1/nfts/1", None)).await).await;
    assert_eq!(detail["blockchain"], "Polygon");
    assert_eq!(detail["token_id"], "42");

    let resp = send(&app, get("/v1/nfts/999", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["error"], "not_found");
}

// ── System ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_does_not_create_sessions() {
    let app = app();
    let resp = send(&app, get("/v1/sys/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key(header::SET_COOKIE));

    let health = json_body(resp).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["active_sessions"], 0);
}

#[tokio::test]
async fn security_headers_are_set() {
    let app = app();
    let resp = send(&app, get("/", None)).await;
    assert_eq!(resp.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(resp.headers()[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
}
