//! Marketplace listing with search, category filter, and grid/list layout.

use maud::{Markup, html};

use b2peak_core::catalog::{CategoryFilter, MarketplaceQuery, NftSummary, ViewMode};

use super::layout::{Chrome, page};

/// Query string for the marketplace with `view` swapped in.
fn marketplace_href(query: &MarketplaceQuery, view: ViewMode) -> String {
    let mut href = format!(
        "/marketplace?category={}&view={}",
        query.category.as_str(),
        view.as_str()
    );
    if !query.search.is_empty() {
        href.push_str("&search=");
        href.push_str(&urlencoding::encode(&query.search));
    }
    href
}

fn card(nft: &NftSummary) -> Markup {
    html! {
        a.panel.card href={ "/nft/" (nft.id) } {
            img src=(nft.image) alt=(nft.title) loading="lazy";
            div {
                span.badge { (nft.rarity.as_str()) }
                h3 { (nft.title) }
                p.muted { (nft.description) }
                p.muted { "By " (nft.organization) }
                p {
                    strong { (nft.price) }
                    " "
                    span.muted { "\u{2665} " (nft.likes) " \u{b7} " (nft.views) " views" }
                }
            }
        }
    }
}

pub fn render(chrome: &Chrome, query: &MarketplaceQuery, view: ViewMode, items: &[NftSummary]) -> Markup {
    let content = html! {
        h1 { "NFT Marketplace" }
        p.muted { "Discover and collect unique NFTs from verified organizations" }

        form.panel method="get" action="/marketplace" {
            input type="search" name="search" value=(query.search) placeholder="Search NFTs or organizations...";
            " "
            select name="category" {
                @for option in CategoryFilter::options() {
                    option value=(option.as_str()) selected[option == query.category] { (option.label()) }
                }
            }
            input type="hidden" name="view" value=(view.as_str());
            " "
            button type="submit" { "Filter" }
            " "
            a.button.secondary[view == ViewMode::Grid] href=(marketplace_href(query, ViewMode::Grid)) { "Grid" }
            " "
            a.button.secondary[view == ViewMode::List] href=(marketplace_href(query, ViewMode::List)) { "List" }
        }

        p.results { (items.len()) " NFTs found" }

        div class=(view.as_str()) {
            @for nft in items {
                (card(nft))
            }
        }
        @if items.is_empty() {
            p.muted { "No NFTs match your search. Try a different term or category." }
        }
    };
    page(chrome, content)
}
