//! Principal references from the legacy `.pkla` grammar.
//!
//! Canonical string forms:
//! - User: `unix-user:alice`
//! - Group: `unix-group:admins`
//! - Netgroup: `unix-netgroup:ops` (the name may itself contain colons)

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};

use crate::error::ConvertError;

/// The three principal kinds the legacy format recognizes. Closed set;
/// anything else in an identity token is a parse error.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, StrumDisplay, EnumString,
)]
pub enum IdentityKind {
    #[strum(serialize = "unix-user")]
    User,
    #[strum(serialize = "unix-group")]
    Group,
    #[strum(serialize = "unix-netgroup")]
    Netgroup,
}

impl IdentityKind {
    /// Parse a legacy type prefix (`unix-user`, `unix-group`, `unix-netgroup`).
    pub fn parse_kind(token: &str) -> Result<Self, ConvertError> {
        IdentityKind::from_str(token)
            .map_err(|_| ConvertError::UnknownIdentityType(token.to_string()))
    }
}

/// A principal reference: kind plus verbatim name.
///
/// The name is everything after the first colon of the legacy token and is
/// never interpreted further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Identity {
    pub kind: IdentityKind,
    pub name: String,
}

impl Identity {
    pub fn new<T: Into<String>>(kind: IdentityKind, name: T) -> Self {
        Identity {
            kind,
            name: name.into(),
        }
    }

    /// The JavaScript predicate testing whether the acting subject matches
    /// this identity.
    pub fn js_predicate(&self) -> String {
        match self.kind {
            IdentityKind::User => format!("subject.user == \"{}\"", self.name),
            IdentityKind::Group => format!("subject.isInGroup(\"{}\")", self.name),
            IdentityKind::Netgroup => format!("subject.isInNetGroup(\"{}\")", self.name),
        }
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

impl FromStr for Identity {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, name)) = s.split_once(':') else {
            return Err(ConvertError::MalformedIdentityToken(s.to_string()));
        };
        Ok(Identity::new(IdentityKind::parse_kind(kind)?, name))
    }
}
