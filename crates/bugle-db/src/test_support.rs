//! Shared fixtures for bugle-db tests.

pub(crate) mod helpers {
    use bugle_config::ValidationMode;
    use bugle_core::entities::{Project, Ticket, User};

    use crate::service::TrackerService;
    use crate::updates::ticket::TicketDraftBuilder;

    /// Fresh in-memory service with lenient intake validation.
    pub(crate) async fn test_service() -> TrackerService {
        TrackerService::new_local(":memory:", ValidationMode::Lenient)
            .await
            .unwrap()
    }

    /// Register a user with a placeholder credential.
    pub(crate) async fn signup(svc: &TrackerService, email: &str) -> User {
        svc.signup(email, email, "test-hash").await.unwrap()
    }

    /// File a ticket through the admin path, optionally assigned.
    pub(crate) async fn submit_admin_ticket(
        svc: &TrackerService,
        admin: &User,
        project: &Project,
        title: &str,
        assignee: Option<&str>,
    ) -> Ticket {
        let mut draft = TicketDraftBuilder::new().title(title);
        if let Some(user_id) = assignee {
            draft = draft.assignee(user_id);
        }
        svc.submit_ticket(&project.id, Some(admin.id.as_str()), &draft.build())
            .await
            .unwrap()
    }
}
