use std::fmt;

use crate::graph::ParentRole;

/// Machine-readable error codes for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DocumentParseError,
    UnknownPerson,
    UnknownFamily,
    UnknownRelationship,
    DuplicatePerson,
    MalformedRelationship,
    ChildSlotOutOfRange,
    MissingParent,
    UnknownSubtree,
    InvalidMerge,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DocumentParseError => "E1002",
            Self::UnknownPerson => "E2001",
            Self::UnknownFamily => "E2002",
            Self::UnknownRelationship => "E2003",
            Self::DuplicatePerson => "E2004",
            Self::MalformedRelationship => "E2005",
            Self::ChildSlotOutOfRange => "E3001",
            Self::MissingParent => "E3002",
            Self::UnknownSubtree => "E3003",
            Self::InvalidMerge => "E3004",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DocumentParseError => "Document parse error",
            Self::UnknownPerson => "Person not found",
            Self::UnknownFamily => "Family not found",
            Self::UnknownRelationship => "Relationship not found",
            Self::DuplicatePerson => "Duplicate person id",
            Self::MalformedRelationship => "Malformed relationship",
            Self::ChildSlotOutOfRange => "Child slot out of range",
            Self::MissingParent => "Expected parent missing",
            Self::UnknownSubtree => "Subtree not found",
            Self::InvalidMerge => "Invalid merge request",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in pedigree.toml and retry."),
            Self::DocumentParseError => Some("Check that the document is valid GedcomX JSON."),
            Self::UnknownPerson | Self::UnknownRelationship => {
                Some("Every relationship must reference persons present in the document.")
            }
            Self::UnknownFamily => Some("Rebuild the chart; family keys change after edits."),
            Self::DuplicatePerson => Some("Merge or rename persons that share an id."),
            Self::MalformedRelationship => {
                Some("Run `pedigree normalize` to assign missing relationship ids.")
            }
            Self::ChildSlotOutOfRange | Self::MissingParent | Self::UnknownSubtree => {
                Some("Rebuild the chart from the current document and retry.")
            }
            Self::InvalidMerge => Some("Pass a survivor followed by at least one other person."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Data-integrity failures while deriving the relationship graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("relationship '{relationship}' references unknown person '{person}'")]
    UnknownPerson { relationship: String, person: String },

    #[error("relationship at index {index} has no id")]
    MissingRelationshipId { index: usize },

    #[error("relationship id '{0}' is used more than once")]
    DuplicateRelationshipId(String),

    #[error("relationship '{0}' is missing a person reference")]
    MissingEndpoint(String),

    #[error("person id '{0}' appears more than once")]
    DuplicatePerson(String),
}

impl GraphError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownPerson { .. } => ErrorCode::UnknownPerson,
            Self::MissingRelationshipId { .. }
            | Self::DuplicateRelationshipId(_)
            | Self::MissingEndpoint(_) => ErrorCode::MalformedRelationship,
            Self::DuplicatePerson(_) => ErrorCode::DuplicatePerson,
        }
    }
}

/// Fatal failures while laying out the chart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("person '{0}' is referenced by a family but missing from the graph")]
    UnknownPerson(String),

    #[error("family '{0}' is referenced by a person but missing from the graph")]
    UnknownFamily(String),
}

impl ChartError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownPerson(_) => ErrorCode::UnknownPerson,
            Self::UnknownFamily(_) => ErrorCode::UnknownFamily,
        }
    }
}

/// Failures raised by document edit operations.
///
/// An edit that fails part-way leaves the document in an unspecified state;
/// callers should discard it for the current transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("person not found: '{0}'")]
    PersonNotFound(String),

    #[error("relationship not found: '{0}'")]
    RelationshipNotFound(String),

    #[error("family not found: '{0}'")]
    FamilyNotFound(String),

    #[error("child slot {index} out of range for family '{family}' ({len} children)")]
    ChildSlotOutOfRange {
        family: String,
        index: usize,
        len: usize,
    },

    #[error("person '{child}' is not a child of family '{family}'")]
    ChildNotInFamily { family: String, child: String },

    #[error("family '{family}' has no {role}")]
    MissingParent { family: String, role: ParentRole },

    #[error("subtree {0} has no persons in the chart")]
    SubtreeNotFound(usize),

    #[error("a child can have at most two new parents, got {0}")]
    TooManyParents(usize),

    #[error("invalid merge: {0}")]
    InvalidMerge(String),
}

impl EditError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::PersonNotFound(_) => ErrorCode::UnknownPerson,
            Self::RelationshipNotFound(_) => ErrorCode::UnknownRelationship,
            Self::FamilyNotFound(_) => ErrorCode::UnknownFamily,
            Self::ChildSlotOutOfRange { .. } | Self::ChildNotInFamily { .. } => {
                ErrorCode::ChildSlotOutOfRange
            }
            Self::MissingParent { .. } => ErrorCode::MissingParent,
            Self::SubtreeNotFound(_) => ErrorCode::UnknownSubtree,
            Self::TooManyParents(_) | Self::InvalidMerge(_) => ErrorCode::InvalidMerge,
        }
    }
}
