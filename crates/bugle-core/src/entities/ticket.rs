use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{TicketPriority, TicketStatus, TicketType};

/// A ticket within a project.
///
/// Minimal tickets submitted through public intake carry only title and
/// description; the structured fields stay unset until an Admin triages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    /// Owning project. Immutable for the lifetime of the ticket.
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
    pub ticket_type: Option<TicketType>,
    /// Assigned developer. Nulled by the store when the user is deleted.
    pub assignee_id: Option<String>,
    /// Server-set at creation, immutable.
    pub created_at: DateTime<Utc>,
}
