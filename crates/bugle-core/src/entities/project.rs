use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A project owning tickets and memberships.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Shareable secret enabling unauthenticated ticket intake for this
    /// project. Generated at creation, unique across projects.
    pub ticket_form_key: String,
    pub created_at: DateTime<Utc>,
}
