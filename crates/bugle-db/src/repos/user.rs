//! User repository — signup, profile reads, deletion.

use chrono::Utc;

use bugle_core::entities::User;
use bugle_core::ids::PREFIX_USER;

use crate::error::TrackerError;
use crate::helpers::parse_datetime;
use crate::service::TrackerService;

const SELECT_COLS: &str = "id, username, email, display_name, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, TrackerError> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        display_name: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

/// Row-existence check usable inside a transaction.
pub(crate) async fn user_exists_on(
    conn: &libsql::Connection,
    user_id: &str,
) -> Result<bool, TrackerError> {
    let mut rows = conn
        .query("SELECT 1 FROM users WHERE id = ?1", [user_id])
        .await?;
    Ok(rows.next().await?.is_some())
}

impl TrackerService {
    /// Register a new user.
    ///
    /// The username is a system-generated opaque handle; callers never pick
    /// one. `password_hash` is whatever opaque string the hashing
    /// collaborator produced — it is stored verbatim and never read back
    /// outside the login path.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank email or credential, `Conflict` when
    /// the email is already registered.
    pub async fn signup(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<User, TrackerError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(TrackerError::InvalidArgument(
                "a valid email is required".into(),
            ));
        }
        if password_hash.is_empty() {
            return Err(TrackerError::InvalidArgument(
                "a credential is required".into(),
            ));
        }

        let id = self.db().generate_id(PREFIX_USER).await?;
        // 30-char hex handle, matching the historical opaque-username width
        let username = self.db().generate_secret(15).await?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO users (id, username, email, display_name, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    username.as_str(),
                    email,
                    display_name,
                    password_hash,
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| TrackerError::from_write(e, "email already registered"))?;

        tracing::debug!(user_id = %id, "user signed up");
        Ok(User {
            id,
            username,
            email: email.to_string(),
            display_name: display_name.to_string(),
            created_at: now,
        })
    }

    /// Fetch a user's public profile. The credential hash is not part of
    /// the projection.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such user exists.
    pub async fn get_user(&self, user_id: &str) -> Result<User, TrackerError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"),
                [user_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| TrackerError::not_found("user", user_id))?;
        row_to_user(&row)
    }

    pub(crate) async fn user_exists(&self, user_id: &str) -> Result<bool, TrackerError> {
        user_exists_on(self.db().conn(), user_id).await
    }

    /// Delete a user.
    ///
    /// Tickets assigned to the user survive with a NULL assignee; the
    /// user's membership rows and session tokens are removed by the store's
    /// cascade rules.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such user exists.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), TrackerError> {
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", [user_id])
            .await?;
        if affected == 0 {
            return Err(TrackerError::not_found("user", user_id));
        }
        tracing::debug!(user_id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn signup_roundtrip() {
        let svc = test_service().await;
        let user = svc
            .signup("dev@example.com", "Dev One", "hash-1")
            .await
            .unwrap();

        assert!(user.id.starts_with("usr-"));
        assert_eq!(user.email, "dev@example.com");
        assert_eq!(user.display_name, "Dev One");

        let fetched = svc.get_user(&user.id).await.unwrap();
        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn signup_generates_opaque_username() {
        let svc = test_service().await;
        let user = svc.signup("a@example.com", "A", "h").await.unwrap();

        assert_eq!(user.username.len(), 30);
        assert!(user.username.chars().all(|c| c.is_ascii_hexdigit()));

        let other = svc.signup("b@example.com", "B", "h").await.unwrap();
        assert_ne!(user.username, other.username);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = test_service().await;
        svc.signup("dup@example.com", "First", "h1").await.unwrap();

        let result = svc.signup("dup@example.com", "Second", "h2").await;
        assert!(matches!(result, Err(TrackerError::Conflict(_))));
    }

    #[tokio::test]
    async fn blank_email_rejected() {
        let svc = test_service().await;
        assert!(matches!(
            svc.signup("", "A", "h").await,
            Err(TrackerError::InvalidArgument(_))
        ));
        assert!(matches!(
            svc.signup("not-an-email", "A", "h").await,
            Err(TrackerError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn get_missing_user_not_found() {
        let svc = test_service().await;
        let result = svc.get_user("usr-nope").await;
        assert!(matches!(
            result,
            Err(TrackerError::NotFound { entity: "user", .. })
        ));
    }

    #[tokio::test]
    async fn delete_user() {
        let svc = test_service().await;
        let user = svc.signup("gone@example.com", "G", "h").await.unwrap();

        svc.delete_user(&user.id).await.unwrap();
        assert!(svc.get_user(&user.id).await.is_err());

        let again = svc.delete_user(&user.id).await;
        assert!(matches!(again, Err(TrackerError::NotFound { .. })));
    }
}
