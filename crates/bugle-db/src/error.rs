//! Error types for bugle-db.
//!
//! One taxonomy covers both authorization outcomes and store failures so
//! every service operation returns a single error type. Authorization
//! failures prefer `PermissionDenied` over `NotFound` when the resource
//! exists but is inaccessible; absent parents keep their `NotFound`
//! contract.

use thiserror::Error;

/// Errors from tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Entity lookup returned no row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Caller is authenticated but not allowed to perform the operation,
    /// or holds no membership in the project.
    #[error("permission denied")]
    PermissionDenied,

    /// Missing or invalid session token.
    #[error("not authenticated")]
    Unauthenticated,

    /// Missing required field or, in strict mode, an unrecognized label.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Uniqueness violation (duplicate email, duplicate membership pair).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Map a write failure, turning libSQL UNIQUE violations into `Conflict`.
    pub fn from_write(e: libsql::Error, what: &str) -> Self {
        if e.to_string().contains("UNIQUE constraint failed") {
            Self::Conflict(what.to_string())
        } else {
            Self::LibSql(e)
        }
    }
}
