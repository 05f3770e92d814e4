//! Closed choice sets for roles and ticket fields.
//!
//! Every enum carries its exact wire label (the strings stored in SQL and
//! shown to API consumers), an `as_str()` accessor, and a `from_label()`
//! reverse lookup backed by a static table. Nothing in the system compares
//! role or label strings ad hoc; everything goes through these types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role of a user within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Role {
    Admin,
    Developer,
}

impl Role {
    pub const LABELS: &'static [&'static str] = &["Admin", "Developer"];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Developer => "Developer",
        }
    }

    /// Reverse lookup from a wire label. `None` for unrecognized labels.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Admin" => Some(Self::Admin),
            "Developer" => Some(Self::Developer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Resolver output for a (user, project) pair.
///
/// `NoRelation` is a sentinel distinct from both roles: the user exists but
/// holds no membership row. Callers that need 403 semantics map it to a
/// permission failure at the guard boundary, never by string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Admin,
    Developer,
    NoRelation,
}

impl Membership {
    /// The concrete role, if a membership row exists.
    #[must_use]
    pub const fn role(self) -> Option<Role> {
        match self {
            Self::Admin => Some(Role::Admin),
            Self::Developer => Some(Role::Developer),
            Self::NoRelation => None,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub const fn is_member(self) -> bool {
        !matches!(self, Self::NoRelation)
    }
}

impl From<Role> for Membership {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Developer => Self::Developer,
        }
    }
}

// ---------------------------------------------------------------------------
// TicketPriority
// ---------------------------------------------------------------------------

/// Priority of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub const LABELS: &'static [&'static str] = &["Low", "Medium", "High"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }

    /// Position in label order, used by the grouping comparator.
    #[must_use]
    pub const fn rank(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

/// Status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub const LABELS: &'static [&'static str] = &["Open", "Closed"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Open" => Some(Self::Open),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }

    #[must_use]
    pub const fn rank(self) -> usize {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TicketType
// ---------------------------------------------------------------------------

/// Type of a ticket. The wire labels contain slashes and are preserved
/// verbatim for compatibility with stored rows and intake forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TicketType {
    #[serde(rename = "Feature/Request")]
    FeatureRequest,
    #[serde(rename = "Bug/Error")]
    BugError,
    Others,
}

impl TicketType {
    pub const LABELS: &'static [&'static str] = &["Feature/Request", "Bug/Error", "Others"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FeatureRequest => "Feature/Request",
            Self::BugError => "Bug/Error",
            Self::Others => "Others",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Feature/Request" => Some(Self::FeatureRequest),
            "Bug/Error" => Some(Self::BugError),
            "Others" => Some(Self::Others),
            _ => None,
        }
    }

    #[must_use]
    pub const fn rank(self) -> usize {
        match self {
            Self::FeatureRequest => 0,
            Self::BugError => 1,
            Self::Others => 2,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GroupKey
// ---------------------------------------------------------------------------

/// Grouping key accepted by the ticket listing.
///
/// Parsed once at the call boundary; an unrecognized key parses to `None`
/// and the listing falls through ungrouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Priority,
    Status,
    Type,
}

impl GroupKey {
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "priority" => Some(Self::Priority),
            "status" => Some(Self::Status),
            "type" => Some(Self::Type),
            _ => None,
        }
    }

    /// The label set the grouped column is validated against.
    #[must_use]
    pub const fn label_set(self) -> &'static [&'static str] {
        match self {
            Self::Priority => TicketPriority::LABELS,
            Self::Status => TicketStatus::LABELS,
            Self::Type => TicketType::LABELS,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
