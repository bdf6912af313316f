//! Form login and logout: `/auth/*`
//!
//! The navigation shell posts here. Both handlers act on the caller's
//! session and redirect (303) back to the page the form was on.

use std::sync::Arc;

use axum::extract::Path;
use axum::response::Redirect;
use axum::routing::post;
use axum::{Extension, Form, Router};
use serde::Deserialize;
use tracing::info;

use b2peak_core::identity::LoginKind;

use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Build the `/auth` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login/{kind}", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnTo {
    pub return_to: Option<String>,
}

/// Start a login; the session is pending when the redirect lands.
async fn login(
    Extension(session): CurrentSession,
    Path(kind): Path<String>,
    Form(form): Form<ReturnTo>,
) -> Result<Redirect, AppError> {
    let kind: LoginKind = kind.parse()?;
    let ticket = session.store().login(kind);
    info!(session_id = %session.id(), %kind, ticket, "login requested");
    Ok(Redirect::to(safe_return_to(form.return_to.as_deref())))
}

async fn logout(Extension(session): CurrentSession, Form(form): Form<ReturnTo>) -> Redirect {
    session.store().logout();
    Redirect::to(safe_return_to(form.return_to.as_deref()))
}

/// Only local absolute paths are honoured; anything else goes home.
///
/// Rejects scheme-relative (`//host`) and backslash (`/\host`) forms that
/// browsers resolve to another origin.
#[must_use]
pub fn safe_return_to(raw: Option<&str>) -> &str {
    match raw {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}
