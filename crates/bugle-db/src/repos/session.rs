//! Session token persistence — the `SessionStore` impl backing
//! `bugle_auth::AuthService`.
//!
//! Tokens are 32-char opaque hex strings in the `sessions` table, cascade-
//! deleted with their user. One live token per user is the expected shape;
//! `active_token` returns the oldest row if that invariant is ever bent.

use bugle_auth::{SessionStore, StoredCredential};

use crate::error::TrackerError;
use crate::service::TrackerService;

impl SessionStore for TrackerService {
    type Error = TrackerError;

    async fn credential_for_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredential>, TrackerError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, password_hash FROM users WHERE email = ?1",
                [email],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(StoredCredential {
                user_id: row.get(0)?,
                password_hash: row.get(1)?,
            })),
            None => Ok(None),
        }
    }

    async fn active_token(&self, user_id: &str) -> Result<Option<String>, TrackerError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT token FROM sessions WHERE user_id = ?1 ORDER BY created_at LIMIT 1",
                [user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    async fn mint_token(&self, user_id: &str) -> Result<String, TrackerError> {
        let token = self.db().generate_secret(16).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
                libsql::params![
                    token.as_str(),
                    user_id,
                    chrono::Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(token)
    }

    async fn user_for_token(&self, token: &str) -> Result<Option<String>, TrackerError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT user_id FROM sessions WHERE token = ?1", [token])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    async fn revoke_token(&self, token: &str) -> Result<bool, TrackerError> {
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM sessions WHERE token = ?1", [token])
            .await?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{signup, test_service};
    use bugle_auth::{AuthService, OpaqueVerifier};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn tokens_roundtrip_through_the_table() {
        let svc = test_service().await;
        let user = signup(&svc, "a@example.com").await;

        let token = svc.mint_token(&user.id).await.unwrap();
        assert_eq!(token.len(), 32);
        assert_eq!(svc.user_for_token(&token).await.unwrap(), Some(user.id.clone()));
        assert_eq!(svc.active_token(&user.id).await.unwrap(), Some(token.clone()));

        assert!(svc.revoke_token(&token).await.unwrap());
        assert!(!svc.revoke_token(&token).await.unwrap());
        assert_eq!(svc.user_for_token(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn credential_lookup_matches_signup() {
        let svc = test_service().await;
        let user = svc
            .signup("dev@example.com", "Dev", "stored-hash")
            .await
            .unwrap();

        let credential = svc
            .credential_for_email("dev@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credential.user_id, user.id);
        assert_eq!(credential.password_hash, "stored-hash");

        assert!(svc.credential_for_email("ghost@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn auth_service_runs_against_the_store() {
        let svc = test_service().await;
        let user = svc
            .signup("dev@example.com", "Dev", "s3cret")
            .await
            .unwrap();

        let auth = AuthService::new(&svc, OpaqueVerifier);
        let token = auth.login("dev@example.com", "s3cret").await.unwrap();
        assert_eq!(auth.resolve(&token).await.unwrap(), user.id);

        // Second login reuses the live token.
        assert_eq!(auth.login("dev@example.com", "s3cret").await.unwrap(), token);

        auth.logout(&token).await.unwrap();
        assert!(auth.resolve(&token).await.is_err());
    }

    #[tokio::test]
    async fn deleting_a_user_revokes_their_sessions() {
        let svc = test_service().await;
        let user = signup(&svc, "a@example.com").await;

        let token = svc.mint_token(&user.id).await.unwrap();
        svc.delete_user(&user.id).await.unwrap();

        assert_eq!(svc.user_for_token(&token).await.unwrap(), None);
    }
}
