//! Role resolution and membership maintenance.
//!
//! `resolve_membership` is a pure lookup: it never writes. The maintainer
//! functions (`ensure_developer`, `release_assignee`) take an explicit
//! connection so ticket writes can run them inside the same transaction as
//! the ticket row change.

use chrono::Utc;

use bugle_core::entities::ProjectMember;
use bugle_core::enums::{Membership, Role};
use bugle_core::ids::PREFIX_MEMBER;

use crate::TrackerDb;
use crate::error::TrackerError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::repos::user::user_exists_on;
use crate::service::TrackerService;

/// Current role for a `(user, project)` pair, on an explicit connection.
pub(crate) async fn role_for(
    conn: &libsql::Connection,
    user_id: &str,
    project_id: &str,
) -> Result<Option<Role>, TrackerError> {
    let mut rows = conn
        .query(
            "SELECT role FROM project_members WHERE user_id = ?1 AND project_id = ?2",
            [user_id, project_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(parse_enum(&row.get::<String>(0)?)?)),
        None => Ok(None),
    }
}

/// Get-or-create a Developer membership for an assignee.
///
/// Idempotent: an existing row is left untouched, so an Admin is never
/// downgraded by being assigned a ticket.
pub(crate) async fn ensure_developer(
    conn: &libsql::Connection,
    user_id: &str,
    project_id: &str,
) -> Result<(), TrackerError> {
    let id = TrackerDb::generate_id_on(conn, PREFIX_MEMBER).await?;
    conn.execute(
        "INSERT INTO project_members (id, user_id, project_id, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (user_id, project_id) DO NOTHING",
        libsql::params![
            id.as_str(),
            user_id,
            project_id,
            Role::Developer.as_str(),
            Utc::now().to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

/// Drop a developer's membership in `project_id` when `excluding_ticket`
/// was their last assigned ticket there.
///
/// The count deliberately excludes the ticket being edited: its stored row
/// still names the old assignee until the caller's UPDATE lands. Admin
/// memberships are never removed by assignment churn.
pub(crate) async fn release_assignee(
    conn: &libsql::Connection,
    user_id: &str,
    project_id: &str,
    excluding_ticket: &str,
) -> Result<(), TrackerError> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM tickets
             WHERE assignee_id = ?1 AND project_id = ?2 AND id != ?3",
            [user_id, project_id, excluding_ticket],
        )
        .await?;
    let remaining = rows
        .next()
        .await?
        .ok_or(TrackerError::NoResult)?
        .get::<i64>(0)?;

    if remaining == 0 {
        conn.execute(
            "DELETE FROM project_members
             WHERE user_id = ?1 AND project_id = ?2 AND role != ?3",
            [user_id, project_id, Role::Admin.as_str()],
        )
        .await?;
        tracing::debug!(user_id, project_id, "assignee released from project");
    }
    Ok(())
}

impl TrackerService {
    /// Resolve a user's standing in a project.
    ///
    /// Returns `Membership::NoRelation` when the user exists but holds no
    /// membership row — including when the project itself does not exist.
    /// Resolution never mutates state.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn resolve_membership(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Membership, TrackerError> {
        if !self.user_exists(user_id).await? {
            return Err(TrackerError::not_found("user", user_id));
        }
        match role_for(self.db().conn(), user_id, project_id).await? {
            Some(role) => Ok(role.into()),
            None => Ok(Membership::NoRelation),
        }
    }

    /// Fetch the raw membership row, if any.
    pub async fn get_membership(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<ProjectMember>, TrackerError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, user_id, project_id, role, created_at
                 FROM project_members WHERE user_id = ?1 AND project_id = ?2",
                [user_id, project_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(ProjectMember {
                id: row.get(0)?,
                user_id: row.get(1)?,
                project_id: row.get(2)?,
                role: parse_enum(&row.get::<String>(3)?)?,
                created_at: parse_datetime(&row.get::<String>(4)?)?,
            })),
            None => Ok(None),
        }
    }

    pub(crate) async fn require_member(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Membership, TrackerError> {
        let membership = self.resolve_membership(user_id, project_id).await?;
        if membership.is_member() {
            Ok(membership)
        } else {
            Err(TrackerError::PermissionDenied)
        }
    }

    pub(crate) async fn require_admin(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<(), TrackerError> {
        if self.resolve_membership(user_id, project_id).await?.is_admin() {
            Ok(())
        } else {
            Err(TrackerError::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{signup, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn creator_resolves_as_admin() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let membership = svc.resolve_membership(&owner.id, &project.id).await.unwrap();
        assert_eq!(membership, Membership::Admin);
    }

    #[tokio::test]
    async fn stranger_resolves_as_no_relation() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let stranger = signup(&svc, "stranger@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let membership = svc
            .resolve_membership(&stranger.id, &project.id)
            .await
            .unwrap();
        assert_eq!(membership, Membership::NoRelation);
    }

    #[tokio::test]
    async fn missing_project_is_no_relation_not_an_error() {
        let svc = test_service().await;
        let user = signup(&svc, "u@example.com").await;

        let membership = svc.resolve_membership(&user.id, "prj-nope").await.unwrap();
        assert_eq!(membership, Membership::NoRelation);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let svc = test_service().await;
        let result = svc.resolve_membership("usr-nope", "prj-nope").await;
        assert!(matches!(
            result,
            Err(TrackerError::NotFound { entity: "user", .. })
        ));
    }

    #[tokio::test]
    async fn ensure_developer_is_idempotent() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let dev = signup(&svc, "dev@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        let conn = svc.db().conn();
        ensure_developer(conn, &dev.id, &project.id).await.unwrap();
        ensure_developer(conn, &dev.id, &project.id).await.unwrap();

        let membership = svc.resolve_membership(&dev.id, &project.id).await.unwrap();
        assert_eq!(membership, Membership::Developer);
    }

    #[tokio::test]
    async fn ensure_developer_never_downgrades_admin() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        ensure_developer(svc.db().conn(), &owner.id, &project.id)
            .await
            .unwrap();

        let membership = svc.resolve_membership(&owner.id, &project.id).await.unwrap();
        assert_eq!(membership, Membership::Admin);
    }

    #[tokio::test]
    async fn release_keeps_admin_membership() {
        let svc = test_service().await;
        let owner = signup(&svc, "owner@example.com").await;
        let project = svc.create_project(&owner.id, "Core", None).await.unwrap();

        release_assignee(svc.db().conn(), &owner.id, &project.id, "tkt-nope")
            .await
            .unwrap();

        let membership = svc.resolve_membership(&owner.id, &project.id).await.unwrap();
        assert_eq!(membership, Membership::Admin);
    }
}
