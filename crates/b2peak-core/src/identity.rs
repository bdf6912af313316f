//! Identity model.
//!
//! An [`Identity`] is the authenticated principal of a session. The
//! organization reference only exists on the [`Identity::Organization`]
//! variant, so no caller ever has to check for a missing field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Reference to the organization an organization member acts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationRef {
    pub id: String,
    pub name: String,
}

/// A member signing in on behalf of an organization (SSO-style login).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationMember {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub organization: OrganizationRef,
}

/// An individual holder signing in with a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndividualUser {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

/// The principal attached to a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// Nobody is signed in.
    #[default]
    Anonymous,
    Organization(OrganizationMember),
    IndividualUser(IndividualUser),
}

impl Identity {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Organization(member) => Some(&member.display_name),
            Self::IndividualUser(user) => Some(&user.display_name),
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Organization(member) => Some(&member.email),
            Self::IndividualUser(user) => Some(&user.email),
        }
    }

    /// The organization this identity acts for, if it is an organization member.
    #[must_use]
    pub const fn organization(&self) -> Option<&OrganizationRef> {
        match self {
            Self::Organization(member) => Some(&member.organization),
            Self::Anonymous | Self::IndividualUser(_) => None,
        }
    }

    /// Short machine-readable variant name, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Organization(_) => "organization",
            Self::IndividualUser(_) => "individual_user",
        }
    }
}

/// Which login affordance the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginKind {
    /// "Connect Wallet": resolves to an individual user.
    Wallet,
    /// "Sign In": resolves to an organization member.
    Organization,
}

impl LoginKind {
    /// Both affordances, in the order the navigation shell shows them.
    pub const ALL: [Self; 2] = [Self::Wallet, Self::Organization];

    /// Button label for this affordance.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wallet => "Connect Wallet",
            Self::Organization => "Sign In",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for LoginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wallet" => Ok(Self::Wallet),
            "organization" => Ok(Self::Organization),
            other => Err(ParseError::LoginKind(other.to_owned())),
        }
    }
}

/// Fixture returned for an organization login.
#[must_use]
pub fn organization_fixture() -> Identity {
    Identity::Organization(OrganizationMember {
        id: "1".to_owned(),
        display_name: "John Doe".to_owned(),
        email: "john@university.edu".to_owned(),
        organization: OrganizationRef {
            id: "org1".to_owned(),
            name: "Tech University".to_owned(),
        },
    })
}

/// Fixture returned for a wallet login.
#[must_use]
pub fn wallet_fixture() -> Identity {
    Identity::IndividualUser(IndividualUser {
        id: "2".to_owned(),
        display_name: "Alice Smith".to_owned(),
        email: "alice@example.com".to_owned(),
    })
}

/// The fixture identity a stub provider hands out for `kind`.
#[must_use]
pub fn fixture_for(kind: LoginKind) -> Identity {
    match kind {
        LoginKind::Wallet => wallet_fixture(),
        LoginKind::Organization => organization_fixture(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_fields() {
        let identity = Identity::default();
        assert!(!identity.is_authenticated());
        assert_eq!(identity.display_name(), None);
        assert_eq!(identity.email(), None);
        assert!(identity.organization().is_none());
    }

    #[test]
    fn organization_fixture_carries_organization() {
        let identity = organization_fixture();
        assert!(identity.is_authenticated());
        assert_eq!(identity.display_name(), Some("John Doe"));
        assert_eq!(identity.organization().unwrap().name, "Tech University");
    }

    #[test]
    fn wallet_fixture_has_no_organization() {
        let identity = wallet_fixture();
        assert_eq!(identity.display_name(), Some("Alice Smith"));
        assert!(identity.organization().is_none());
    }

    #[test]
    fn login_kind_parses_case_insensitively() {
        assert_eq!("Wallet".parse::<LoginKind>().unwrap(), LoginKind::Wallet);
        assert_eq!(
            "ORGANIZATION".parse::<LoginKind>().unwrap(),
            LoginKind::Organization
        );
        assert!(matches!(
            "sso".parse::<LoginKind>(),
            Err(ParseError::LoginKind(_))
        ));
    }

    #[test]
    fn identity_serializes_with_kind_tag() {
        let json = serde_json::to_value(organization_fixture()).unwrap();
        assert_eq!(json["kind"], "organization");
        assert_eq!(json["organization"]["name"], "Tech University");

        let json = serde_json::to_value(Identity::Anonymous).unwrap();
        assert_eq!(json["kind"], "anonymous");
    }
}
