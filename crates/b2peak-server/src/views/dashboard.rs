//! Organization dashboard and the access-denied view.

use maud::{Markup, html};

use b2peak_core::dashboard::{Campaign, CampaignStatus, Dashboard, DashboardTab};

use super::layout::{Chrome, page};

/// Shown to anonymous visitors. Carries no dashboard data at all.
pub fn render_denied(chrome: &Chrome) -> Markup {
    let content = html! {
        section.denied {
            h2 { "Access Denied" }
            p.muted { "Please sign in to access the dashboard." }
        }
    };
    page(chrome, content)
}

pub fn render(chrome: &Chrome, dashboard: &Dashboard, tab: DashboardTab) -> Markup {
    let content = html! {
        header {
            h1 { "Welcome back, " (dashboard.display_name) }
            p.muted { (dashboard.organization_label()) " Dashboard" }
        }
        nav.tabs {
            @for candidate in DashboardTab::ALL {
                a class=[(candidate == tab).then_some("active")] href={ "/dashboard?tab=" (candidate.as_str()) } {
                    (candidate.label())
                }
            }
        }
        @match tab {
            DashboardTab::Overview => { (overview(dashboard)) }
            DashboardTab::Campaigns => { (campaigns(&dashboard.campaigns)) }
            DashboardTab::Analytics => { (analytics()) }
            DashboardTab::Settings => { (settings(dashboard)) }
        }
    };
    page(chrome, content)
}

fn overview(dashboard: &Dashboard) -> Markup {
    html! {
        div.grid.stats {
            @for stat in &dashboard.stats {
                div.panel {
                    p { strong { (stat.value) } }
                    p.muted { (stat.label) }
                    p.change { (stat.change) }
                }
            }
        }
        div.grid.actions {
            div.panel {
                h3 { "Create Campaign" }
                p.muted { "Upload metadata and launch a new NFT campaign" }
                a.button href="/dashboard?tab=campaigns" { "Get Started" }
            }
            div.panel {
                h3 { "QR Verification" }
                p.muted { "Generate QR codes for NFT verification" }
                a.button.secondary href="/marketplace" { "Generate QR" }
            }
            div.panel {
                h3 { "View Analytics" }
                p.muted { "Track performance and engagement metrics" }
                a.button href="/dashboard?tab=analytics" { "View Reports" }
            }
        }
    }
}

fn campaign_card(campaign: &Campaign) -> Markup {
    let status_class = match campaign.status {
        CampaignStatus::Active => "badge active",
        CampaignStatus::Draft => "badge draft",
    };
    html! {
        div.panel.campaign {
            h3 { (campaign.name) }
            p.muted {
                (campaign.kind) " \u{b7} Created " (campaign.created.format("%Y-%m-%d"))
                " "
                span class=(status_class) { (campaign.status.as_str()) }
            }
            div.grid {
                div { strong { (campaign.total) } p.muted { "Total Supply" } }
                div { strong { (campaign.claimed) } p.muted { "Claimed" } }
                div { strong { (campaign.completion_percent()) "%" } p.muted { "Completion" } }
            }
        }
    }
}

fn campaigns(campaigns: &[Campaign]) -> Markup {
    html! {
        h2 { "Your Campaigns" }
        div.list {
            @for campaign in campaigns {
                (campaign_card(campaign))
            }
        }
    }
}

fn analytics() -> Markup {
    html! {
        h2 { "Analytics Dashboard" }
        div.grid {
            div.panel {
                h3 { "Campaign Performance" }
                p.muted { "Chart visualization would go here" }
            }
            div.panel {
                h3 { "User Engagement" }
                p.muted { "Engagement metrics would go here" }
            }
        }
    }
}

fn settings(dashboard: &Dashboard) -> Markup {
    html! {
        h2 { "Organization Settings" }
        div.grid {
            div.panel {
                h3 { "Organization Profile" }
                label {
                    "Organization Name"
                    input type="text" value=[dashboard.organization_name.as_deref()] readonly;
                }
                label {
                    "Contact Email"
                    input type="email" value=(dashboard.email) readonly;
                }
            }
            div.panel {
                h3 { "Blockchain Settings" }
                label {
                    "Default Network"
                    select {
                        @for network in &dashboard.networks {
                            option { (network) }
                        }
                    }
                }
                label {
                    "Wallet Address"
                    input type="text" placeholder="0x..." readonly;
                }
            }
        }
    }
}
