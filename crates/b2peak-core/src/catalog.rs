//! NFT catalog: marketplace listings, detail records, and the search filter.
//!
//! The [`NftSource`] trait is the boundary a real indexer or contract reader
//! would implement. [`FixtureCatalog`] serves the six demo NFTs.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{FetchError, ParseError};

/// Marketplace category of an NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Education,
    Tickets,
    Collectibles,
    Membership,
}

impl Category {
    pub const ALL: [Self; 4] = [
        Self::Education,
        Self::Tickets,
        Self::Collectibles,
        Self::Membership,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Tickets => "tickets",
            Self::Collectibles => "collectibles",
            Self::Membership => "membership",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Tickets => "Tickets",
            Self::Collectibles => "Collectibles",
            Self::Membership => "Membership",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "education" => Ok(Self::Education),
            "tickets" => Ok(Self::Tickets),
            "collectibles" => Ok(Self::Collectibles),
            "membership" => Ok(Self::Membership),
            other => Err(ParseError::Category(other.to_owned())),
        }
    }
}

/// Category selector on the marketplace: everything, or one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Every selectable option, `all` first.
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }

    #[must_use]
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Categories",
            Self::Only(category) => category.label(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Marketplace layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }
}

impl FromStr for ViewMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(ParseError::ViewMode(other.to_owned())),
        }
    }
}

/// Display rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// Marketplace listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NftSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: String,
    pub organization: String,
    pub category: Category,
    pub rarity: Rarity,
    pub likes: u32,
    pub views: u32,
}

/// A single `trait_type: value` pair from the token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Everything the detail page shows about one NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NftDetail {
    #[serde(flatten)]
    pub summary: NftSummary,
    /// Longer text for the detail page; the listing text is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub owner: String,
    pub contract_address: String,
    pub token_id: String,
    pub blockchain: String,
    pub created: NaiveDate,
    pub attributes: Vec<Attribute>,
    pub benefits: Vec<String>,
}

impl NftDetail {
    /// Description shown on the detail page.
    #[must_use]
    pub fn full_description(&self) -> &str {
        self.long_description
            .as_deref()
            .unwrap_or(&self.summary.description)
    }
}

/// Marketplace search state: free-text search plus category selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketplaceQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl MarketplaceQuery {
    #[must_use]
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    /// Case-insensitive substring match on title or organization name.
    #[must_use]
    pub fn matches_search(&self, nft: &NftSummary) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        nft.title.to_lowercase().contains(&needle)
            || nft.organization.to_lowercase().contains(&needle)
    }

    #[must_use]
    pub fn matches_category(&self, nft: &NftSummary) -> bool {
        self.category.admits(nft.category)
    }

    /// An item passes iff it matches the search AND the category selector.
    #[must_use]
    pub fn matches(&self, nft: &NftSummary) -> bool {
        self.matches_search(nft) && self.matches_category(nft)
    }

    /// Filter `items`, keeping their order.
    pub fn apply<'a, I>(&self, items: I) -> Vec<NftSummary>
    where
        I: IntoIterator<Item = &'a NftSummary>,
    {
        items
            .into_iter()
            .filter(|nft| self.matches(nft))
            .cloned()
            .collect()
    }
}

/// Source of NFT listings and detail records.
#[async_trait::async_trait]
pub trait NftSource: Send + Sync + 'static {
    /// List every NFT that passes `query`, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the source cannot be reached.
    async fn list_nfts(&self, query: &MarketplaceQuery) -> Result<Vec<NftSummary>, FetchError>;

    /// Fetch one NFT by id.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] for an unknown id and
    /// [`FetchError::Network`] if the source cannot be reached.
    async fn get_nft(&self, id: &str) -> Result<NftDetail, FetchError>;
}

/// In-memory catalog of the demo NFTs.
#[derive(Debug, Clone)]
pub struct FixtureCatalog {
    items: Vec<NftDetail>,
}

impl FixtureCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: fixture_nfts(),
        }
    }

    /// Summaries of every NFT, in catalog order.
    pub fn summaries(&self) -> impl Iterator<Item = &NftSummary> {
        self.items.iter().map(|detail| &detail.summary)
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NftSource for FixtureCatalog {
    async fn list_nfts(&self, query: &MarketplaceQuery) -> Result<Vec<NftSummary>, FetchError> {
        Ok(query.apply(self.summaries()))
    }

    async fn get_nft(&self, id: &str) -> Result<NftDetail, FetchError> {
        self.items
            .iter()
            .find(|detail| detail.summary.id == id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { id: id.to_owned() })
    }
}

const PEXELS: &str = "https://images.pexels.com/photos";

fn image(photo: u32) -> String {
    format!("{PEXELS}/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=800")
}

fn attrs(pairs: &[(&str, &str)]) -> Vec<Attribute> {
    pairs
        .iter()
        .map(|(trait_type, value)| Attribute {
            trait_type: (*trait_type).to_owned(),
            value: (*value).to_owned(),
        })
        .collect()
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[allow(clippy::too_many_arguments)]
fn summary(
    id: &str,
    title: &str,
    description: &str,
    photo: u32,
    price: &str,
    organization: &str,
    category: Category,
    rarity: Rarity,
    (likes, views): (u32, u32),
) -> NftSummary {
    NftSummary {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        image: image(photo),
        price: price.to_owned(),
        organization: organization.to_owned(),
        category,
        rarity,
        likes,
        views,
    }
}

fn fixture_nfts() -> Vec<NftDetail> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        NftDetail {
            summary: summary(
                "1",
                "Digital Diploma - Computer Science",
                "Official Computer Science degree from Tech University",
                267_885,
                "0.05 ETH",
                "Tech University",
                Category::Education,
                Rarity::Legendary,
                (24, 156),
            ),
            long_description: Some(
                "Official Computer Science degree certificate issued by Tech University. \
                 This NFT serves as a tamper-proof digital credential that can be verified \
                 anywhere in the world."
                    .to_owned(),
            ),
            owner: "0x1234...5678".to_owned(),
            contract_address: "0xabcd...efgh".to_owned(),
            token_id: "42".to_owned(),
            blockchain: "Polygon".to_owned(),
            created: date(2024, 1, 15),
            attributes: attrs(&[
                ("Degree", "Bachelor of Science"),
                ("Major", "Computer Science"),
                ("Year", "2024"),
                ("Honors", "Cum Laude"),
                ("Institution", "Tech University"),
            ]),
            benefits: owned(&[
                "Digital verification of degree completion",
                "Access to alumni network",
                "Reduced verification time for employers",
                "Permanent record on blockchain",
            ]),
        },
        NftDetail {
            summary: summary(
                "2",
                "Championship Final Ticket",
                "Exclusive access to the 2024 Championship Final",
                274_506,
                "0.02 ETH",
                "SportsFest",
                Category::Tickets,
                Rarity::Epic,
                (45, 289),
            ),
            long_description: None,
            owner: "0x9f3c...21ab".to_owned(),
            contract_address: "0x7d21...c0de".to_owned(),
            token_id: "1088".to_owned(),
            blockchain: "Polygon".to_owned(),
            created: date(2024, 2, 3),
            attributes: attrs(&[
                ("Event", "Championship Final"),
                ("Section", "North Stand"),
                ("Seat", "14B"),
                ("Season", "2024"),
            ]),
            benefits: owned(&[
                "Gate entry with QR verification",
                "Transferable until kickoff",
                "Commemorative collectible after the match",
            ]),
        },
        NftDetail {
            summary: summary(
                "3",
                "Team Collectible #001",
                "Limited edition team collectible with special perks",
                1_105_666,
                "0.01 ETH",
                "FC Champions",
                Category::Collectibles,
                Rarity::Rare,
                (67, 234),
            ),
            long_description: None,
            owner: "0x55aa...9e10".to_owned(),
            contract_address: "0x3e8f...b00c".to_owned(),
            token_id: "1".to_owned(),
            blockchain: "Ethereum".to_owned(),
            created: date(2024, 2, 20),
            attributes: attrs(&[
                ("Edition", "001"),
                ("Series", "Founders"),
                ("Perk", "Locker room tour"),
            ]),
            benefits: owned(&[
                "Priority access to match tickets",
                "Members-only merchandise drops",
            ]),
        },
        NftDetail {
            summary: summary(
                "4",
                "Conference Badge 2024",
                "Attendee badge for TechConf 2024",
                1_181_605,
                "Free",
                "TechConf",
                Category::Tickets,
                Rarity::Common,
                (12, 78),
            ),
            long_description: None,
            owner: "0x0bad...f00d".to_owned(),
            contract_address: "0x4c0f...2024".to_owned(),
            token_id: "311".to_owned(),
            blockchain: "Optimism".to_owned(),
            created: date(2024, 3, 1),
            attributes: attrs(&[("Tier", "Attendee"), ("Days", "3"), ("Year", "2024")]),
            benefits: owned(&[
                "Venue entry on all conference days",
                "Proof of attendance after the event",
            ]),
        },
        NftDetail {
            summary: summary(
                "5",
                "Membership Card - Gold",
                "Gold tier membership with exclusive benefits",
                164_527,
                "0.03 ETH",
                "Premium Club",
                Category::Membership,
                Rarity::Epic,
                (33, 167),
            ),
            long_description: None,
            owner: "0x77c1...4d2e".to_owned(),
            contract_address: "0x9a9a...601d".to_owned(),
            token_id: "7".to_owned(),
            blockchain: "Polygon".to_owned(),
            created: date(2024, 1, 28),
            attributes: attrs(&[("Tier", "Gold"), ("Renewal", "Annual")]),
            benefits: owned(&[
                "Lounge access at partner venues",
                "Quarterly members-only events",
                "Discounts on future drops",
            ]),
        },
        NftDetail {
            summary: summary(
                "6",
                "Artist Collaboration #042",
                "Unique artwork collaboration piece",
                1_565_982,
                "0.08 ETH",
                "Art Collective",
                Category::Collectibles,
                Rarity::Legendary,
                (89, 445),
            ),
            long_description: None,
            owner: "0xa11c...e042".to_owned(),
            contract_address: "0x5eed...a127".to_owned(),
            token_id: "42".to_owned(),
            blockchain: "Ethereum".to_owned(),
            created: date(2024, 3, 12),
            attributes: attrs(&[
                ("Artist", "Art Collective"),
                ("Edition", "042"),
                ("Medium", "Generative"),
            ]),
            benefits: owned(&[
                "Signed high-resolution print",
                "Invitation to the collaboration showcase",
            ]),
        },
    ]
}
