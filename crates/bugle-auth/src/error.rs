use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No valid session token was presented.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Email unknown or credential mismatch. Deliberately one variant for
    /// both so login failures never reveal whether the email exists.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backing session store failed.
    #[error("session store error: {0}")]
    Store(String),
}
