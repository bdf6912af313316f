//! Client session middleware.
//!
//! Resolves the `b2peak_session` cookie to a [`ClientSession`] and injects it
//! into request extensions. A request without a valid cookie gets a fresh
//! session, and the response carries a `Set-Cookie` for it.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;
use uuid::Uuid;

use crate::session::ClientSession;
use crate::state::AppState;

/// Name of the cookie carrying the client session id.
pub const SESSION_COOKIE: &str = "b2peak_session";

/// Axum middleware that attaches the caller's [`ClientSession`].
///
/// Injects `Arc<ClientSession>` into request extensions.
pub async fn client_session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = session_id(req.headers());
    let (session, created) = state.sessions.resolve(presented).await;
    let id = session.id();
    req.extensions_mut().insert(session);

    let mut response = next.run(req).await;

    if created {
        let cookie = session_cookie(id, state.config.secure_cookies);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "failed to encode session cookie"),
        }
    }

    response
}

/// Extract the session id from the `Cookie` header(s), if present and valid.
#[must_use]
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find_map(|raw| Uuid::parse_str(raw.trim()).ok())
}

fn session_cookie(id: Uuid, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Shorthand used by handlers that only need the session handle.
pub type CurrentSession = axum::Extension<Arc<ClientSession>>;
