//! HTTP route handlers.
//!
//! - `pages`: server-rendered HTML pages and NFT page actions
//! - `auth`: form login/logout that redirect back to the page
//! - `api`: JSON API under `/v1`
//! - `sys`: health endpoint, no client session attached

pub mod api;
pub mod auth;
pub mod pages;
pub mod sys;

use axum::http::Uri;

use b2peak_core::nav::navigation_for;

use crate::session::ClientSession;
use crate::views::Chrome;

/// Page chrome for `session` on the page at `uri`.
///
/// The page auto-refreshes while a login is pending, or when the caller
/// asks for it (`refresh`), so the next render picks up the result.
pub(crate) fn chrome_for(session: &ClientSession, title: &str, uri: &Uri, refresh: bool) -> Chrome {
    let snapshot = session.store().snapshot();
    let return_to = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), |pq| pq.as_str().to_owned());
    Chrome {
        title: title.to_owned(),
        nav: navigation_for(&snapshot, uri.path()),
        return_to,
        refresh: refresh || snapshot.is_pending(),
    }
}
