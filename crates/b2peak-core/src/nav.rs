//! Navigation shell model.
//!
//! Derived purely from the session snapshot and the current path, so every
//! page renders the same links and actions for the same session.

use serde::Serialize;

use crate::error::AuthError;
use crate::identity::LoginKind;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Right-hand side of the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavActions {
    /// Signed in: display name, dashboard shortcut, logout.
    UserMenu { display_name: String },
    /// Signed out: one button per [`LoginKind`].
    LoginChoices { choices: Vec<LoginKind> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavModel {
    pub links: Vec<NavLink>,
    pub actions: NavActions,
    /// A login attempt is in flight.
    pub pending: bool,
    /// Why the last login attempt failed, if it did.
    pub failure: Option<AuthError>,
}

const HOME: (&str, &str) = ("/", "Home");
const MARKETPLACE: (&str, &str) = ("/marketplace", "Marketplace");
const DASHBOARD: (&str, &str) = ("/dashboard", "Dashboard");

/// Build the shell for `session` while the user is on `current_path`.
#[must_use]
pub fn navigation_for(session: &Session, current_path: &str) -> NavModel {
    let identity = session.identity();

    let mut entries = vec![HOME, MARKETPLACE];
    if identity.is_authenticated() {
        entries.push(DASHBOARD);
    }
    let links = entries
        .into_iter()
        .map(|(path, label)| NavLink {
            path,
            label,
            active: path == current_path,
        })
        .collect();

    let actions = match identity.display_name() {
        Some(name) => NavActions::UserMenu {
            display_name: name.to_owned(),
        },
        None => NavActions::LoginChoices {
            choices: LoginKind::ALL.to_vec(),
        },
    };

    NavModel {
        links,
        actions,
        pending: session.is_pending(),
        failure: session.failure().cloned(),
    }
}
