//! # bugle-auth
//!
//! Session-token authentication for the Bugle backend.
//!
//! Provides the `AuthService` contract the core calls:
//! `login(credentials) -> token`, `resolve(token) -> user id`, and
//! `logout(token)`. Tokens are opaque strings persisted by a
//! [`SessionStore`] (implemented by `bugle-db`); credential hashing is a
//! [`CredentialVerifier`] collaborator.

pub mod error;
pub mod store;
pub mod verifier;

pub use error::AuthError;
pub use store::{SessionStore, StoredCredential};
pub use verifier::{CredentialVerifier, OpaqueVerifier};

/// Token-based authentication over a session store.
pub struct AuthService<S, V = OpaqueVerifier> {
    store: S,
    verifier: V,
}

impl<S: SessionStore, V: CredentialVerifier> AuthService<S, V> {
    pub const fn new(store: S, verifier: V) -> Self {
        Self { store, verifier }
    }

    /// Verify credentials and return a session token.
    ///
    /// A user with a live token gets the same token back (logging in from a
    /// second client does not invalidate the first); otherwise a fresh one
    /// is minted.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidCredentials` for an unknown email or a credential
    /// mismatch, `AuthError::Store` if the store fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let credential = self
            .store
            .credential_for_email(email)
            .await
            .map_err(store_err)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verifier.verify(password, &credential.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if let Some(token) = self
            .store
            .active_token(&credential.user_id)
            .await
            .map_err(store_err)?
        {
            return Ok(token);
        }

        let token = self
            .store
            .mint_token(&credential.user_id)
            .await
            .map_err(store_err)?;
        tracing::debug!(user_id = %credential.user_id, "minted session token");
        Ok(token)
    }

    /// Resolve a presented token to a user id.
    ///
    /// # Errors
    ///
    /// `AuthError::NotAuthenticated` for an unknown or revoked token.
    pub async fn resolve(&self, token: &str) -> Result<String, AuthError> {
        self.store
            .user_for_token(token)
            .await
            .map_err(store_err)?
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Invalidate the caller's token.
    ///
    /// # Errors
    ///
    /// `AuthError::NotAuthenticated` if the token was not live.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if self.store.revoke_token(token).await.map_err(store_err)? {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}

fn store_err<E: std::error::Error>(e: E) -> AuthError {
    AuthError::Store(e.to_string())
}
