//! Session store seam.
//!
//! The token table lives in the entity store; this trait is the narrow
//! surface `AuthService` needs from it. `bugle-db` implements it for its
//! service type, and tests implement it in memory.

use std::future::Future;

/// Credential row looked up at login. The hash is whatever opaque string
/// the hashing collaborator stored at signup; this crate never interprets it.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub user_id: String,
    pub password_hash: String,
}

pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up the stored credential for an email. `None` if no such user.
    fn credential_for_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<StoredCredential>, Self::Error>> + Send;

    /// The user's live session token, if one exists.
    fn active_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Mint and persist a fresh opaque token for the user.
    fn mint_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Resolve a token to its user. `None` for unknown/revoked tokens.
    fn user_for_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Delete a token. Returns whether a row was removed.
    fn revoke_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

// Borrowed stores work too, so `AuthService` can share a store with the
// rest of the application.
impl<S: SessionStore + Sync> SessionStore for &S {
    type Error = S::Error;

    fn credential_for_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<StoredCredential>, Self::Error>> + Send {
        (**self).credential_for_email(email)
    }

    fn active_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send {
        (**self).active_token(user_id)
    }

    fn mint_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        (**self).mint_token(user_id)
    }

    fn user_for_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send {
        (**self).user_for_token(token)
    }

    fn revoke_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        (**self).revoke_token(token)
    }
}
