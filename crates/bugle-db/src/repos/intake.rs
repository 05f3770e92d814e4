//! Ticket intake — the dual-mode submission path behind the public form.
//!
//! One entry point serves two callers: a project Admin filing a full ticket
//! from inside the app, and an anonymous visitor posting through the shared
//! intake form. The mode is decided by resolving the caller's membership,
//! never by trusting a flag in the payload.

use chrono::Utc;

use bugle_core::entities::Ticket;
use bugle_core::ids::PREFIX_TICKET;

use crate::TrackerDb;
use crate::error::TrackerError;
use crate::repos::member::ensure_developer;
use crate::repos::ticket::resolve_labels;
use crate::service::TrackerService;
use crate::updates::ticket::TicketDraft;

impl TrackerService {
    /// Submit a new ticket to a project.
    ///
    /// Admin mode (the caller resolves to the project's Admin): every draft
    /// field is honored, labels are resolved per the configured validation
    /// mode, and an assignee is enrolled as a Developer in the same
    /// transaction as the insert.
    ///
    /// Anonymous mode (no caller, an unknown caller, or a caller without
    /// the Admin role): only title and description are stored; structured
    /// fields in the payload are ignored rather than rejected.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing project or (in admin mode) assignee,
    /// `InvalidArgument` for a missing title or (admin mode, strict
    /// validation) an unrecognized label.
    pub async fn submit_ticket(
        &self,
        project_id: &str,
        caller: Option<&str>,
        draft: &TicketDraft,
    ) -> Result<Ticket, TrackerError> {
        if !self.project_exists(project_id).await? {
            return Err(TrackerError::not_found("project", project_id));
        }

        let title = draft
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TrackerError::InvalidArgument("ticket title is required".into()))?;

        // Unknown caller ids fall through to anonymous mode: the public
        // form must keep accepting submissions after a user is deleted.
        let admin = match caller {
            Some(user_id) if self.user_exists(user_id).await? => self
                .resolve_membership(user_id, project_id)
                .await?
                .is_admin(),
            _ => false,
        };

        if admin {
            self.submit_full(project_id, title, draft).await
        } else {
            self.submit_minimal(project_id, title, draft).await
        }
    }

    async fn submit_full(
        &self,
        project_id: &str,
        title: &str,
        draft: &TicketDraft,
    ) -> Result<Ticket, TrackerError> {
        let (priority, status, ticket_type) = resolve_labels(draft, self.intake_validation())?;

        if let Some(assignee) = draft.assignee_id.as_deref()
            && !self.user_exists(assignee).await?
        {
            return Err(TrackerError::not_found("user", assignee));
        }

        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;
        let id = TrackerDb::generate_id_on(&tx, PREFIX_TICKET).await?;

        tx.execute(
            "INSERT INTO tickets
                 (id, project_id, title, description, priority, status, type, assignee_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            libsql::params![
                id.as_str(),
                project_id,
                title,
                draft.description.as_deref(),
                priority.map(bugle_core::enums::TicketPriority::as_str),
                status.map(bugle_core::enums::TicketStatus::as_str),
                ticket_type.map(bugle_core::enums::TicketType::as_str),
                draft.assignee_id.as_deref(),
                now.to_rfc3339()
            ],
        )
        .await?;

        if let Some(assignee) = draft.assignee_id.as_deref() {
            ensure_developer(&tx, assignee, project_id).await?;
        }
        tx.commit().await?;

        tracing::debug!(ticket_id = %id, project_id, "ticket filed by admin");
        Ok(Ticket {
            id,
            project_id: project_id.to_string(),
            title: title.to_string(),
            description: draft.description.clone(),
            priority,
            status,
            ticket_type,
            assignee_id: draft.assignee_id.clone(),
            created_at: now,
        })
    }

    async fn submit_minimal(
        &self,
        project_id: &str,
        title: &str,
        draft: &TicketDraft,
    ) -> Result<Ticket, TrackerError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TICKET).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO tickets (id, project_id, title, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    project_id,
                    title,
                    draft.description.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(ticket_id = %id, project_id, "ticket filed via public intake");
        Ok(Ticket {
            id,
            project_id: project_id.to_string(),
            title: title.to_string(),
            description: draft.description.clone(),
            priority: None,
            status: None,
            ticket_type: None,
            assignee_id: None,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{signup, test_service};
    use crate::updates::ticket::TicketDraftBuilder;
    use bugle_core::enums::{Membership, TicketPriority, TicketStatus, TicketType};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn admin_submission_honors_all_fields() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let dev = signup(&svc, "dev@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let draft = TicketDraftBuilder::new()
            .title("Crash on save")
            .description("stack trace attached")
            .priority("High")
            .status("Open")
            .ticket_type("Bug/Error")
            .assignee(&dev.id)
            .build();
        let ticket = svc
            .submit_ticket(&project.id, Some(owner.id.as_str()), &draft)
            .await
            .unwrap();

        assert!(ticket.id.starts_with("tkt-"));
        assert_eq!(ticket.priority, Some(TicketPriority::High));
        assert_eq!(ticket.status, Some(TicketStatus::Open));
        assert_eq!(ticket.ticket_type, Some(TicketType::BugError));
        assert_eq!(ticket.assignee_id.as_deref(), Some(dev.id.as_str()));

        // Assignment enrolled the developer.
        assert_eq!(
            svc.resolve_membership(&dev.id, &project.id).await.unwrap(),
            Membership::Developer
        );
    }

    #[tokio::test]
    async fn anonymous_submission_ignores_structured_fields() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let draft = TicketDraftBuilder::new()
            .title("Found a bug")
            .description("it broke")
            .priority("High")
            .assignee(&owner.id)
            .build();
        let ticket = svc.submit_ticket(&project.id, None, &draft).await.unwrap();

        assert_eq!(ticket.title, "Found a bug");
        assert_eq!(ticket.description.as_deref(), Some("it broke"));
        assert_eq!(ticket.priority, None);
        assert_eq!(ticket.assignee_id, None);
    }

    #[tokio::test]
    async fn developer_caller_gets_anonymous_mode() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let dev = signup(&svc, "dev@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let seed = TicketDraftBuilder::new().title("seed").assignee(&dev.id).build();
        svc.submit_ticket(&project.id, Some(owner.id.as_str()), &seed)
            .await
            .unwrap();

        let draft = TicketDraftBuilder::new()
            .title("dev filed")
            .priority("High")
            .build();
        let ticket = svc
            .submit_ticket(&project.id, Some(dev.id.as_str()), &draft)
            .await
            .unwrap();
        assert_eq!(ticket.priority, None);
    }

    #[tokio::test]
    async fn unknown_caller_gets_anonymous_mode() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let draft = TicketDraftBuilder::new()
            .title("still works")
            .priority("High")
            .build();
        let ticket = svc
            .submit_ticket(&project.id, Some("usr-deleted"), &draft)
            .await
            .unwrap();
        assert_eq!(ticket.priority, None);
    }

    #[tokio::test]
    async fn title_is_required_in_both_modes() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let draft = TicketDraftBuilder::new().description("no title").build();
        assert!(matches!(
            svc.submit_ticket(&project.id, None, &draft).await,
            Err(TrackerError::InvalidArgument(_))
        ));
        assert!(matches!(
            svc.submit_ticket(&project.id, Some(owner.id.as_str()), &draft).await,
            Err(TrackerError::InvalidArgument(_))
        ));

        let blank = TicketDraftBuilder::new().title("   ").build();
        assert!(matches!(
            svc.submit_ticket(&project.id, None, &blank).await,
            Err(TrackerError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let svc = test_service().await;
        let draft = TicketDraftBuilder::new().title("T").build();
        let result = svc.submit_ticket("prj-nope", None, &draft).await;
        assert!(matches!(
            result,
            Err(TrackerError::NotFound {
                entity: "project",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn admin_submission_rejects_unknown_assignee() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let draft = TicketDraftBuilder::new()
            .title("T")
            .assignee("usr-nope")
            .build();
        let result = svc
            .submit_ticket(&project.id, Some(owner.id.as_str()), &draft)
            .await;
        assert!(matches!(
            result,
            Err(TrackerError::NotFound { entity: "user", .. })
        ));
    }
}
