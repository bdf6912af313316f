//! NFT detail page: like toggle, verification status, and QR modal.

use maud::{Markup, html};

use b2peak_core::catalog::NftDetail;
use b2peak_core::verification::VerificationStatus;

use super::layout::{Chrome, page};

/// Per-client state shown alongside the NFT.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub liked: bool,
    pub verification: VerificationStatus,
    pub show_qr: bool,
}

pub fn render(chrome: &Chrome, nft: &NftDetail, state: &DetailState) -> Markup {
    let summary = &nft.summary;
    let likes = summary.likes.saturating_add(u32::from(state.liked));
    let base = format!("/nft/{}", summary.id);

    let content = html! {
        a.muted href="/marketplace" { "\u{2190} Back to Marketplace" }

        div.grid {
            div {
                img.hero-image src=(summary.image) alt=(summary.title);
                p {
                    span.badge { (summary.rarity.as_str()) }
                    " "
                    form.inline method="post" action={ (base) "/like" } {
                        button.secondary[state.liked] type="submit" aria-pressed=(state.liked) {
                            @if state.liked { "\u{2665} Liked" } @else { "\u{2661} Like" }
                        }
                    }
                }
                p {
                    a.button href={ (base) "?qr=1" } { "Generate QR" }
                    " "
                    form.inline method="post" action={ (base) "/verify" } {
                        button.secondary type="submit"
                            disabled[state.verification == VerificationStatus::Pending] {
                            (state.verification.label())
                        }
                    }
                }
                @if let Some(reason) = state.verification.failure_reason() {
                    p.alert { "Verification failed: " (reason) }
                }
            }

            div {
                h1 { (summary.title) }
                p.muted { "By " (summary.organization) " \u{b7} " (summary.category.label()) }
                div.panel {
                    p { strong { (summary.price) } }
                    p.muted { "\u{2665} " (likes) " likes \u{b7} " (summary.views) " views" }
                }
                h2 { "Description" }
                p { (nft.full_description()) }

                h2 { "Benefits" }
                ul {
                    @for benefit in &nft.benefits {
                        li { (benefit) }
                    }
                }

                h2 { "Attributes" }
                div.grid {
                    @for attribute in &nft.attributes {
                        div.panel {
                            p.muted { (attribute.trait_type) }
                            p { strong { (attribute.value) } }
                        }
                    }
                }

                h2 { "Blockchain Details" }
                dl.panel {
                    dt { "Owner" } dd { code { (nft.owner) } }
                    dt { "Contract Address" } dd { code { (nft.contract_address) } }
                    dt { "Token ID" } dd { (nft.token_id) }
                    dt { "Blockchain" } dd { (nft.blockchain) }
                    dt { "Created" } dd { (nft.created.format("%Y-%m-%d")) }
                }
            }
        }

        @if state.show_qr {
            div.modal role="dialog" aria-modal="true" {
                div.panel {
                    h3 { "Verification QR Code" }
                    img src={ (base) "/qr" } alt="Verification QR code" width="192" height="192";
                    p.muted { "Scan this code to verify the authenticity of this NFT" }
                    a.button.secondary href=(base) { "Close" }
                    " "
                    a.button href={ (base) "/qr" } download={ "nft-" (summary.id) "-qr.svg" } { "Download" }
                }
            }
        }
    };
    page(chrome, content)
}
