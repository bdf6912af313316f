//! Server-rendered HTML views.
//!
//! Every page is a `maud` template wrapped in the shared [`layout::page`]
//! chrome. Templates only read the core models they are given; routing and
//! session access stay in `routes`.

pub mod dashboard;
pub mod detail;
pub mod landing;
pub mod layout;
pub mod marketplace;
pub mod not_found;

use axum::response::Html;
use maud::Markup;

pub use layout::Chrome;

/// Convert a rendered template into an Axum HTML response body.
#[must_use]
pub fn render(markup: Markup) -> Html<String> {
    Html(markup.into_string())
}
