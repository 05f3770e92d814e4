//! Ticket repository — access-filtered reads, admin-gated writes, and the
//! reassignment transaction.

use bugle_config::ValidationMode;
use bugle_core::entities::Ticket;
use bugle_core::enums::{
    GroupKey, Membership, TicketPriority, TicketStatus, TicketType,
};

use crate::error::TrackerError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_enum};
use crate::repos::member::{ensure_developer, release_assignee};
use crate::repos::user::user_exists_on;
use crate::service::TrackerService;
use crate::updates::ticket::TicketDraft;

const SELECT_COLS: &str =
    "id, project_id, title, description, priority, status, type, assignee_id, created_at";

fn row_to_ticket(row: &libsql::Row) -> Result<Ticket, TrackerError> {
    Ok(Ticket {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        priority: parse_optional_enum(get_opt_string(row, 4)?.as_deref())?,
        status: parse_optional_enum(get_opt_string(row, 5)?.as_deref())?,
        ticket_type: parse_optional_enum(get_opt_string(row, 6)?.as_deref())?,
        assignee_id: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

pub(crate) async fn fetch_ticket_on(
    conn: &libsql::Connection,
    project_id: &str,
    ticket_id: &str,
) -> Result<Option<Ticket>, TrackerError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM tickets WHERE id = ?1 AND project_id = ?2"),
            [ticket_id, project_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_ticket(&row)?)),
        None => Ok(None),
    }
}

fn resolve_label<T>(
    label: Option<&str>,
    field: &str,
    lookup: impl Fn(&str) -> Option<T>,
    mode: ValidationMode,
) -> Result<Option<T>, TrackerError> {
    match label {
        None => Ok(None),
        Some(raw) => match (lookup(raw), mode) {
            (Some(value), _) => Ok(Some(value)),
            (None, ValidationMode::Lenient) => Ok(None),
            (None, ValidationMode::Strict) => Err(TrackerError::InvalidArgument(format!(
                "unrecognized {field} label '{raw}'"
            ))),
        },
    }
}

/// Resolve a draft's structured labels against the closed label sets.
///
/// Lenient mode stores unrecognized labels as unset; strict mode rejects
/// them.
pub(crate) fn resolve_labels(
    draft: &TicketDraft,
    mode: ValidationMode,
) -> Result<
    (
        Option<TicketPriority>,
        Option<TicketStatus>,
        Option<TicketType>,
    ),
    TrackerError,
> {
    Ok((
        resolve_label(
            draft.priority.as_deref(),
            "priority",
            TicketPriority::from_label,
            mode,
        )?,
        resolve_label(
            draft.status.as_deref(),
            "status",
            TicketStatus::from_label,
            mode,
        )?,
        resolve_label(
            draft.ticket_type.as_deref(),
            "type",
            TicketType::from_label,
            mode,
        )?,
    ))
}

fn group_rank(ticket: &Ticket, key: GroupKey) -> usize {
    // Unset fields sort after every real label.
    match key {
        GroupKey::Priority => ticket.priority.map_or(usize::MAX, TicketPriority::rank),
        GroupKey::Status => ticket.status.map_or(usize::MAX, TicketStatus::rank),
        GroupKey::Type => ticket.ticket_type.map_or(usize::MAX, TicketType::rank),
    }
}

impl TrackerService {
    /// Fetch one ticket, access-filtered.
    ///
    /// Admins see every ticket in the project; Developers only tickets
    /// assigned to them.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing project or ticket, `PermissionDenied` when
    /// the caller has no membership or is a Developer reading someone
    /// else's ticket.
    pub async fn get_ticket(
        &self,
        caller_id: &str,
        project_id: &str,
        ticket_id: &str,
    ) -> Result<Ticket, TrackerError> {
        if !self.project_exists(project_id).await? {
            return Err(TrackerError::not_found("project", project_id));
        }
        let membership = self.require_member(caller_id, project_id).await?;

        let ticket = fetch_ticket_on(self.db().conn(), project_id, ticket_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("ticket", ticket_id))?;

        if membership == Membership::Developer && ticket.assignee_id.as_deref() != Some(caller_id)
        {
            return Err(TrackerError::PermissionDenied);
        }
        Ok(ticket)
    }

    /// List the tickets visible to the caller, in creation order.
    ///
    /// `group_by` accepts `"priority"`, `"status"`, or `"type"`; the listing
    /// is then stably reordered by that field's label order, unset values
    /// last. Unrecognized keys fall through ungrouped.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing project, `PermissionDenied` when the caller
    /// has no membership.
    pub async fn list_tickets(
        &self,
        caller_id: &str,
        project_id: &str,
        group_by: Option<&str>,
    ) -> Result<Vec<Ticket>, TrackerError> {
        if !self.project_exists(project_id).await? {
            return Err(TrackerError::not_found("project", project_id));
        }
        let membership = self.require_member(caller_id, project_id).await?;

        let mut rows = if membership.is_admin() {
            self.db()
                .conn()
                .query(
                    &format!(
                        "SELECT {SELECT_COLS} FROM tickets
                         WHERE project_id = ?1 ORDER BY created_at, id"
                    ),
                    [project_id],
                )
                .await?
        } else {
            self.db()
                .conn()
                .query(
                    &format!(
                        "SELECT {SELECT_COLS} FROM tickets
                         WHERE project_id = ?1 AND assignee_id = ?2
                         ORDER BY created_at, id"
                    ),
                    [project_id, caller_id],
                )
                .await?
        };

        let mut tickets = Vec::new();
        while let Some(row) = rows.next().await? {
            tickets.push(row_to_ticket(&row)?);
        }

        if let Some(key) = group_by.and_then(GroupKey::parse) {
            tickets.sort_by_key(|t| group_rank(t, key));
        }
        Ok(tickets)
    }

    /// Replace a ticket's fields and maintain assignee memberships. Admin
    /// only.
    ///
    /// Full-replace except `title`: an absent title keeps the stored one,
    /// absent structured fields clear the stored values. The old assignee's
    /// Developer membership is dropped when this was their last assigned
    /// ticket in the project; the new assignee is enrolled as a Developer.
    /// The count, the membership changes, and the row update run in one
    /// immediate transaction.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing project, ticket, or assignee,
    /// `PermissionDenied` unless the caller is the project's Admin,
    /// `InvalidArgument` for unrecognized labels in strict mode.
    pub async fn update_ticket(
        &self,
        caller_id: &str,
        project_id: &str,
        ticket_id: &str,
        draft: &TicketDraft,
    ) -> Result<Ticket, TrackerError> {
        if !self.project_exists(project_id).await? {
            return Err(TrackerError::not_found("project", project_id));
        }
        self.require_admin(caller_id, project_id).await?;

        let (priority, status, ticket_type) = resolve_labels(draft, self.intake_validation())?;

        // Immediate transaction: the last-assignment count below must not
        // race a concurrent edit of the same assignee's tickets.
        let tx = self
            .db()
            .conn()
            .transaction_with_behavior(libsql::TransactionBehavior::Immediate)
            .await?;

        let Some(stored) = fetch_ticket_on(&tx, project_id, ticket_id).await? else {
            tx.rollback().await?;
            return Err(TrackerError::not_found("ticket", ticket_id));
        };

        if let Some(assignee) = draft.assignee_id.as_deref()
            && !user_exists_on(&tx, assignee).await?
        {
            tx.rollback().await?;
            return Err(TrackerError::not_found("user", assignee));
        }

        if let Some(old) = stored.assignee_id.as_deref() {
            release_assignee(&tx, old, project_id, ticket_id).await?;
        }
        if let Some(new) = draft.assignee_id.as_deref() {
            ensure_developer(&tx, new, project_id).await?;
        }

        let title = draft
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&stored.title);

        tx.execute(
            "UPDATE tickets SET
                 title = ?3, description = ?4, priority = ?5, status = ?6,
                 type = ?7, assignee_id = ?8
             WHERE id = ?1 AND project_id = ?2",
            libsql::params![
                ticket_id,
                project_id,
                title,
                draft.description.as_deref(),
                priority.map(TicketPriority::as_str),
                status.map(TicketStatus::as_str),
                ticket_type.map(TicketType::as_str),
                draft.assignee_id.as_deref()
            ],
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(ticket_id, project_id, "ticket updated");
        Ok(Ticket {
            id: stored.id,
            project_id: stored.project_id,
            title: title.to_string(),
            description: draft.description.clone(),
            priority,
            status,
            ticket_type,
            assignee_id: draft.assignee_id.clone(),
            created_at: stored.created_at,
        })
    }

    /// Delete a ticket. Admin only.
    ///
    /// Membership rows are untouched: deletion is not a reassignment, so
    /// the assignee keeps their Developer membership even when this was
    /// their last ticket.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing project or ticket, `PermissionDenied`
    /// unless the caller is the project's Admin.
    pub async fn delete_ticket(
        &self,
        caller_id: &str,
        project_id: &str,
        ticket_id: &str,
    ) -> Result<(), TrackerError> {
        if !self.project_exists(project_id).await? {
            return Err(TrackerError::not_found("project", project_id));
        }
        self.require_admin(caller_id, project_id).await?;

        let affected = self
            .db()
            .conn()
            .execute(
                "DELETE FROM tickets WHERE id = ?1 AND project_id = ?2",
                [ticket_id, project_id],
            )
            .await?;
        if affected == 0 {
            return Err(TrackerError::not_found("ticket", ticket_id));
        }
        tracing::debug!(ticket_id, project_id, "ticket deleted");
        Ok(())
    }
}
