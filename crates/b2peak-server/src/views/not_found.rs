//! Not-found page for unknown NFT ids and paths.

use maud::{Markup, html};

use super::layout::{Chrome, page};

pub fn render(chrome: &Chrome, what: &str) -> Markup {
    let content = html! {
        section.not-found {
            h2 { "Not Found" }
            p.muted { (what) }
            a.button href="/marketplace" { "Back to Marketplace" }
        }
    };
    page(chrome, content)
}
