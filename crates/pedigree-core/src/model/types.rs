//! Typed views over GedcomX type URIs.
//!
//! The document stores types as URIs (`http://gedcomx.org/Male`). These enums
//! keep the wire representation intact through `from`/`into` string
//! conversions so unknown URIs round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

const GEDCOMX: &str = "http://gedcomx.org/";

fn strip_gedcomx(uri: &str) -> &str {
    uri.strip_prefix(GEDCOMX).unwrap_or(uri)
}

/// Gender code used by layout (spouse side) and merge (gender adoption).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderType {
    Male,
    Female,
    #[default]
    Unknown,
}

impl GenderType {
    /// Parse a gender URI. Anything other than Male/Female is `Unknown`.
    pub fn from_uri(uri: &str) -> Self {
        match strip_gedcomx(uri) {
            "Male" => Self::Male,
            "Female" => Self::Female,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Male => "http://gedcomx.org/Male",
            Self::Female => "http://gedcomx.org/Female",
            Self::Unknown => "http://gedcomx.org/Unknown",
        }
    }

    /// `true` for Male or Female.
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Male | Self::Female)
    }
}

impl fmt::Display for GenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "?",
        };
        f.write_str(s)
    }
}

/// Relationship type. Only Couple and ParentChild shape the chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipType {
    Couple,
    ParentChild,
    Other(String),
}

impl RelationshipType {
    #[must_use]
    pub fn uri(&self) -> String {
        match self {
            Self::Couple => format!("{GEDCOMX}Couple"),
            Self::ParentChild => format!("{GEDCOMX}ParentChild"),
            Self::Other(uri) => uri.clone(),
        }
    }
}

impl From<String> for RelationshipType {
    fn from(uri: String) -> Self {
        match strip_gedcomx(&uri) {
            "Couple" => Self::Couple,
            "ParentChild" => Self::ParentChild,
            _ => Self::Other(uri),
        }
    }
}

impl From<RelationshipType> for String {
    fn from(kind: RelationshipType) -> Self {
        kind.uri()
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Couple => f.write_str("Couple"),
            Self::ParentChild => f.write_str("ParentChild"),
            Self::Other(uri) => f.write_str(strip_gedcomx(uri)),
        }
    }
}

/// Name part type. Parts of the same type are merged together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NamePartType {
    Prefix,
    Given,
    Surname,
    Suffix,
    Other(String),
}

impl From<String> for NamePartType {
    fn from(uri: String) -> Self {
        match strip_gedcomx(&uri) {
            "Prefix" => Self::Prefix,
            "Given" => Self::Given,
            "Surname" => Self::Surname,
            "Suffix" => Self::Suffix,
            _ => Self::Other(uri),
        }
    }
}

impl From<NamePartType> for String {
    fn from(kind: NamePartType) -> Self {
        match kind {
            NamePartType::Prefix => format!("{GEDCOMX}Prefix"),
            NamePartType::Given => format!("{GEDCOMX}Given"),
            NamePartType::Surname => format!("{GEDCOMX}Surname"),
            NamePartType::Suffix => format!("{GEDCOMX}Suffix"),
            NamePartType::Other(uri) => uri,
        }
    }
}
