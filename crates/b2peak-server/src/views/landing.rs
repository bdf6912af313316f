//! Static marketing page.

use maud::{Markup, html};

use super::layout::{Chrome, page};

struct Feature {
    title: &'static str,
    description: &'static str,
}

struct UseCase {
    title: &'static str,
    description: &'static str,
    photo: u32,
}

struct Testimonial {
    name: &'static str,
    role: &'static str,
    quote: &'static str,
}

const FEATURES: [Feature; 4] = [
    Feature {
        title: "Secure & Verifiable",
        description: "Blockchain-backed NFTs ensure authenticity and prevent counterfeiting",
    },
    Feature {
        title: "Lightning Fast",
        description: "Deploy NFT campaigns in minutes with our intuitive dashboard",
    },
    Feature {
        title: "Multi-Tenant",
        description: "Scalable platform supporting unlimited organizations and campaigns",
    },
    Feature {
        title: "Global Reach",
        description: "Cross-chain compatibility with major blockchain networks",
    },
];

const USE_CASES: [UseCase; 3] = [
    UseCase {
        title: "Digital Diplomas",
        description: "Universities issue tamper-proof digital certificates",
        photo: 267_885,
    },
    UseCase {
        title: "Event Tickets",
        description: "Secure, transferable tickets with built-in verification",
        photo: 1_105_666,
    },
    UseCase {
        title: "Sports Collectibles",
        description: "Limited edition team NFTs with exclusive benefits",
        photo: 274_506,
    },
];

const TESTIMONIALS: [Testimonial; 2] = [
    Testimonial {
        name: "Dr. Sarah Chen",
        role: "Dean, Tech University",
        quote: "B2Peak transformed how we issue digital credentials. Our students love having verifiable NFT diplomas.",
    },
    Testimonial {
        name: "Mike Rodriguez",
        role: "Events Director, SportsFest",
        quote: "The QR code verification system eliminated ticket fraud at our events. Game-changer!",
    },
];

fn photo_url(photo: u32) -> String {
    format!("https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=400")
}

pub fn render(chrome: &Chrome) -> Markup {
    let content = html! {
        section.hero {
            h1 { "Empower Your Organization" br; "with NFT Solutions" }
            p.muted {
                "Create, manage, and distribute digital IDs, tickets, and collectibles with our enterprise-grade NFT platform"
            }
            a.button href="/marketplace" { "Explore Marketplace" }
            " "
            a.button.secondary href="/dashboard" { "Start Free Trial" }
        }

        section.features {
            h2 { "Why Choose B2Peak?" }
            p.muted { "Built for enterprises, designed for scale" }
            div.grid {
                @for feature in &FEATURES {
                    div.panel {
                        h3 { (feature.title) }
                        p.muted { (feature.description) }
                    }
                }
            }
        }

        section.use-cases {
            h2 { "Endless Possibilities" }
            p.muted { "From education to entertainment, B2Peak powers diverse use cases" }
            div.grid {
                @for case in &USE_CASES {
                    div.panel.card {
                        img src=(photo_url(case.photo)) alt=(case.title) loading="lazy";
                        h3 { (case.title) }
                        p.muted { (case.description) }
                    }
                }
            }
        }

        section.testimonials {
            h2 { "Trusted by Organizations Worldwide" }
            div.grid {
                @for testimonial in &TESTIMONIALS {
                    blockquote.panel {
                        p { "\u{201c}" (testimonial.quote) "\u{201d}" }
                        footer {
                            strong { (testimonial.name) }
                            br;
                            span.muted { (testimonial.role) }
                        }
                    }
                }
            }
        }

        section.cta.panel {
            h2 { "Ready to Transform Your Organization?" }
            p.muted { "Join thousands of organizations already using B2Peak" }
            a.button href="/dashboard" { "Start Free Trial" }
            " "
            a.button.secondary href="/marketplace" { "Schedule Demo" }
        }
    };
    page(chrome, content)
}
