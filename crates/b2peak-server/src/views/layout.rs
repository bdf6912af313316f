//! Base document and navigation shell.

use maud::{DOCTYPE, Markup, html};

use b2peak_core::nav::{NavActions, NavModel};

/// Everything the shared page chrome needs.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub title: String,
    pub nav: NavModel,
    /// Local path forms post back to after login or logout.
    pub return_to: String,
    /// Reload the page shortly, used while a login or verification is pending.
    pub refresh: bool,
}

/// Seconds between reloads while something is pending.
const REFRESH_SECS: u32 = 1;

const STYLES: &str = r"
:root { color-scheme: dark; --bg: #0f172a; --panel: #1e293b; --line: #334155; --text: #e2e8f0; --muted: #94a3b8; --accent: #38bdf8; --accent-2: #a78bfa; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--text); }
a { color: inherit; text-decoration: none; }
main { max-width: 72rem; margin: 0 auto; padding: 2rem 1rem 4rem; }
.site-nav { position: sticky; top: 0; display: flex; align-items: center; justify-content: space-between; gap: 1rem; padding: 0.75rem 1.5rem; background: rgba(30, 41, 59, 0.9); border-bottom: 1px solid var(--line); }
.brand { font-weight: 700; font-size: 1.25rem; background: linear-gradient(90deg, var(--accent), var(--accent-2)); -webkit-background-clip: text; background-clip: text; color: transparent; }
.nav-links { display: flex; gap: 0.5rem; list-style: none; margin: 0; padding: 0; }
.nav-links a { padding: 0.4rem 0.75rem; border-radius: 0.4rem; color: var(--muted); }
.nav-links a.active { color: var(--accent); background: rgba(56, 189, 248, 0.1); }
.nav-actions { display: flex; align-items: center; gap: 0.5rem; }
.inline { display: inline; margin: 0; }
button, .button { cursor: pointer; border: 0; border-radius: 0.5rem; padding: 0.5rem 1rem; background: #0369a1; color: white; font: inherit; }
button.secondary, .button.secondary { background: #6d28d9; }
button:disabled { opacity: 0.6; cursor: progress; }
.alert { margin: 1rem auto 0; max-width: 72rem; padding: 0.75rem 1rem; border: 1px solid #b91c1c; border-radius: 0.5rem; background: rgba(185, 28, 28, 0.15); }
.pending { color: var(--muted); font-size: 0.9rem; }
.panel { padding: 1.5rem; background: var(--panel); border: 1px solid var(--line); border-radius: 1rem; }
.grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); }
.list { display: flex; flex-direction: column; gap: 1rem; }
.list .card { display: flex; gap: 1rem; }
.list .card img { width: 10rem; }
.card img, .hero-image { width: 100%; border-radius: 0.75rem; }
.muted { color: var(--muted); }
.badge { display: inline-block; padding: 0.15rem 0.6rem; border-radius: 999px; font-size: 0.75rem; background: rgba(148, 163, 184, 0.15); }
.tabs { display: flex; gap: 1.5rem; border-bottom: 1px solid var(--line); margin-bottom: 2rem; }
.tabs a { padding: 0.75rem 0; color: var(--muted); }
.tabs a.active { color: var(--accent); border-bottom: 2px solid var(--accent); }
.modal { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.6); }
footer { padding: 2rem; text-align: center; color: var(--muted); border-top: 1px solid var(--line); }
";

/// Render a full HTML document around `content`.
pub fn page(chrome: &Chrome, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if chrome.refresh {
                    meta http-equiv="refresh" content=(REFRESH_SECS);
                }
                title { (chrome.title) " | B2Peak" }
                style { (STYLES) }
            }
            body {
                (nav_shell(&chrome.nav, &chrome.return_to))
                @if let Some(failure) = &chrome.nav.failure {
                    div.alert role="alert" { "Sign-in failed: " (failure) }
                }
                main { (content) }
                footer { "© 2024 B2Peak. NFT solutions for organizations." }
            }
        }
    }
}

/// Top navigation bar: brand, links, and the sign-in or user menu.
pub fn nav_shell(nav: &NavModel, return_to: &str) -> Markup {
    html! {
        nav.site-nav {
            a.brand href="/" { "B2Peak" }
            ul.nav-links {
                @for link in &nav.links {
                    li {
                        a class=[link.active.then_some("active")] href=(link.path) { (link.label) }
                    }
                }
            }
            div.nav-actions {
                @if nav.pending {
                    span.pending aria-live="polite" { "Connecting..." }
                }
                @match &nav.actions {
                    NavActions::UserMenu { display_name } => {
                        span.user-name { (display_name) }
                        a.button.secondary href="/dashboard" { "Dashboard" }
                        form.inline method="post" action="/auth/logout" {
                            input type="hidden" name="return_to" value=(return_to);
                            button type="submit" { "Logout" }
                        }
                    }
                    NavActions::LoginChoices { choices } => {
                        @for (index, kind) in choices.iter().enumerate() {
                            form.inline method="post" action={ "/auth/login/" (kind.as_str()) } {
                                input type="hidden" name="return_to" value=(return_to);
                                button.secondary[index > 0] type="submit" disabled[nav.pending] {
                                    (kind.label())
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
