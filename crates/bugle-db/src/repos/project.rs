//! Project repository — lifecycle and membership-scoped reads.

use chrono::Utc;

use bugle_core::entities::Project;
use bugle_core::enums::Role;
use bugle_core::ids::{PREFIX_MEMBER, PREFIX_PROJECT};

use crate::TrackerDb;
use crate::error::TrackerError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::TrackerService;
use crate::updates::project::ProjectUpdate;

const SELECT_COLS: &str = "id, name, description, ticket_form_key, created_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, TrackerError> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        ticket_form_key: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

pub(crate) async fn project_exists_on(
    conn: &libsql::Connection,
    project_id: &str,
) -> Result<bool, TrackerError> {
    let mut rows = conn
        .query("SELECT 1 FROM projects WHERE id = ?1", [project_id])
        .await?;
    Ok(rows.next().await?.is_some())
}

impl TrackerService {
    /// Create a project with `owner_id` as its Admin.
    ///
    /// The project row and the Admin membership are written in one
    /// transaction; a project is never observable without an Admin. A fresh
    /// intake form key is minted on creation and never changes afterwards.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank name, `NotFound` if the owner does
    /// not exist.
    pub async fn create_project(
        &self,
        owner_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, TrackerError> {
        if name.trim().is_empty() {
            return Err(TrackerError::InvalidArgument(
                "project name must not be empty".into(),
            ));
        }
        if !self.user_exists(owner_id).await? {
            return Err(TrackerError::not_found("user", owner_id));
        }

        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;

        let id = TrackerDb::generate_id_on(&tx, PREFIX_PROJECT).await?;
        // 10-char hex key for the public intake URL
        let form_key = TrackerDb::generate_secret_on(&tx, 5).await?;
        tx.execute(
            "INSERT INTO projects (id, name, description, ticket_form_key, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                id.as_str(),
                name,
                description,
                form_key.as_str(),
                now.to_rfc3339()
            ],
        )
        .await?;

        let member_id = TrackerDb::generate_id_on(&tx, PREFIX_MEMBER).await?;
        tx.execute(
            "INSERT INTO project_members (id, user_id, project_id, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                member_id.as_str(),
                owner_id,
                id.as_str(),
                Role::Admin.as_str(),
                now.to_rfc3339()
            ],
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(project_id = %id, owner_id, "project created");

        Ok(Project {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            ticket_form_key: form_key,
            created_at: now,
        })
    }

    /// Fetch a project the caller is a member of.
    ///
    /// # Errors
    ///
    /// `NotFound` if the project does not exist, `PermissionDenied` if it
    /// exists but the caller holds no membership.
    pub async fn get_project(
        &self,
        caller_id: &str,
        project_id: &str,
    ) -> Result<Project, TrackerError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
                [project_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| TrackerError::not_found("project", project_id))?;
        self.require_member(caller_id, project_id).await?;
        row_to_project(&row)
    }

    /// Projects the caller belongs to, in membership order.
    ///
    /// # Errors
    ///
    /// `NotFound` if the caller does not exist.
    pub async fn list_projects(&self, caller_id: &str) -> Result<Vec<Project>, TrackerError> {
        if !self.user_exists(caller_id).await? {
            return Err(TrackerError::not_found("user", caller_id));
        }
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT p.id, p.name, p.description, p.ticket_form_key, p.created_at
                 FROM projects p
                 JOIN project_members m ON m.project_id = p.id
                 WHERE m.user_id = ?1
                 ORDER BY m.created_at, p.id",
                [caller_id],
            )
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }

    /// Apply a partial update to a project. Admin only; the form key and
    /// creation time are immutable.
    ///
    /// # Errors
    ///
    /// `NotFound` if the project does not exist, `PermissionDenied` unless
    /// the caller is its Admin, `InvalidArgument` for a blank name.
    pub async fn update_project(
        &self,
        caller_id: &str,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<Project, TrackerError> {
        if !self.project_exists(project_id).await? {
            return Err(TrackerError::not_found("project", project_id));
        }
        self.require_admin(caller_id, project_id).await?;

        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(TrackerError::InvalidArgument(
                "project name must not be empty".into(),
            ));
        }

        self.db()
            .conn()
            .execute(
                "UPDATE projects SET
                     name = COALESCE(?2, name),
                     description = COALESCE(?3, description)
                 WHERE id = ?1",
                libsql::params![project_id, update.name.as_deref(), update.description.as_deref()],
            )
            .await?;

        self.get_project(caller_id, project_id).await
    }

    /// Delete a project and everything under it. Admin only; the store's
    /// cascade rules remove tickets and memberships.
    ///
    /// # Errors
    ///
    /// `NotFound` if the project does not exist, `PermissionDenied` unless
    /// the caller is its Admin.
    pub async fn delete_project(
        &self,
        caller_id: &str,
        project_id: &str,
    ) -> Result<(), TrackerError> {
        if !self.project_exists(project_id).await? {
            return Err(TrackerError::not_found("project", project_id));
        }
        self.require_admin(caller_id, project_id).await?;

        self.db()
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", [project_id])
            .await?;
        tracing::debug!(project_id, "project deleted");
        Ok(())
    }

    /// Resolve a public intake form key to its project. No authentication
    /// involved; unknown keys are indistinguishable from deleted projects.
    ///
    /// # Errors
    ///
    /// `NotFound` if no project carries the key.
    pub async fn project_for_form_key(&self, form_key: &str) -> Result<Project, TrackerError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE ticket_form_key = ?1"),
                [form_key],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| TrackerError::not_found("project", form_key))?;
        row_to_project(&row)
    }

    pub(crate) async fn project_exists(&self, project_id: &str) -> Result<bool, TrackerError> {
        project_exists_on(self.db().conn(), project_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{signup, test_service};
    use crate::updates::project::ProjectUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_mints_form_key_and_admin() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;

        let project = svc
            .create_project(&owner.id, "Core", Some("the main one"))
            .await
            .unwrap();

        assert!(project.id.starts_with("prj-"));
        assert_eq!(project.ticket_form_key.len(), 10);
        assert!(
            svc.get_membership(&owner.id, &project.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;

        let result = svc.create_project(&owner.id, "   ", None).await;
        assert!(matches!(result, Err(TrackerError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn create_requires_existing_owner() {
        let svc = test_service().await;
        let result = svc.create_project("usr-nope", "Core", None).await;
        assert!(matches!(result, Err(TrackerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn get_distinguishes_absent_from_forbidden() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let stranger = signup(&svc, "stranger@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        assert!(matches!(
            svc.get_project(&owner.id, "prj-nope").await,
            Err(TrackerError::NotFound { .. })
        ));
        assert!(matches!(
            svc.get_project(&stranger.id, &project.id).await,
            Err(TrackerError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn list_only_shows_memberships() {
        let svc = test_service().await;
        let a = signup(&svc, "a@example.com").await;
        let b = signup(&svc, "b@example.com").await;

        let mine = svc.create_project(&a.id, "Mine", None).await.unwrap();
        svc.create_project(&b.id, "Theirs", None).await.unwrap();

        let listed = svc.list_projects(&a.id).await.unwrap();
        assert_eq!(listed, vec![mine]);
    }

    #[tokio::test]
    async fn update_is_partial_and_admin_only() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let stranger = signup(&svc, "stranger@example.com").await;
        let project = svc
            .create_project(&owner.id, "Core", Some("old description"))
            .await
            .unwrap();

        let update = ProjectUpdateBuilder::new().name("Core v2").build();
        let updated = svc
            .update_project(&owner.id, &project.id, &update)
            .await
            .unwrap();
        assert_eq!(updated.name, "Core v2");
        assert_eq!(updated.description.as_deref(), Some("old description"));
        assert_eq!(updated.ticket_form_key, project.ticket_form_key);

        let denied = svc.update_project(&stranger.id, &project.id, &update).await;
        assert!(matches!(denied, Err(TrackerError::PermissionDenied)));
    }

    #[tokio::test]
    async fn delete_cascades_and_is_admin_only() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let stranger = signup(&svc, "stranger@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        assert!(matches!(
            svc.delete_project(&stranger.id, &project.id).await,
            Err(TrackerError::PermissionDenied)
        ));

        svc.delete_project(&owner.id, &project.id).await.unwrap();
        assert!(matches!(
            svc.get_project(&owner.id, &project.id).await,
            Err(TrackerError::NotFound { .. })
        ));
        assert!(
            svc.get_membership(&owner.id, &project.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn form_key_resolves_without_auth() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let resolved = svc
            .project_for_form_key(&project.ticket_form_key)
            .await
            .unwrap();
        assert_eq!(resolved, project);

        assert!(matches!(
            svc.project_for_form_key("0000000000").await,
            Err(TrackerError::NotFound { .. })
        ));
    }
}
