use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Membership row linking one user to one project with a role.
///
/// At most one row exists per (user, project) pair; the store enforces
/// this with a uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectMember {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
