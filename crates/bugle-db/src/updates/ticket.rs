//! Ticket submission payload.
//!
//! `TicketDraft` is the raw wire payload for both intake modes and for
//! ticket updates. Structured fields arrive as labels and are resolved
//! against the closed label sets by the service (lenient or strict,
//! depending on configuration).
//!
//! Update semantics are full-replace except `title`: an absent title falls
//! back to the stored row, while absent structured fields clear the stored
//! value. This mirrors the long-standing PUT contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority label, e.g. `"High"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Status label, e.g. `"Open"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Type label, e.g. `"Bug/Error"`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    /// User id of the developer to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

pub struct TicketDraftBuilder(TicketDraft);

impl TicketDraftBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TicketDraft::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn priority(mut self, label: impl Into<String>) -> Self {
        self.0.priority = Some(label.into());
        self
    }

    #[must_use]
    pub fn status(mut self, label: impl Into<String>) -> Self {
        self.0.status = Some(label.into());
        self
    }

    #[must_use]
    pub fn ticket_type(mut self, label: impl Into<String>) -> Self {
        self.0.ticket_type = Some(label.into());
        self
    }

    #[must_use]
    pub fn assignee(mut self, user_id: impl Into<String>) -> Self {
        self.0.assignee_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn build(self) -> TicketDraft {
        self.0
    }
}

impl Default for TicketDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}
