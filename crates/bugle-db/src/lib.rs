//! # bugle-db
//!
//! libSQL entity store and service layer for the Bugle issue tracker.
//!
//! Handles all relational state: users, projects, project memberships,
//! tickets, and session tokens. Every operation hangs off
//! [`service::TrackerService`]; repo modules add methods via
//! `impl TrackerService` blocks.
//!
//! Uses the `libsql` crate (C `SQLite` fork) — stable API, per-connection
//! foreign-key enforcement, and SQL-side random ID generation.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
pub(crate) mod test_support;

use error::TrackerError;
use libsql::Builder;

/// Central database handle for all Bugle state operations.
///
/// Wraps a libSQL database and connection. Provides ID and secret
/// generation; repository methods live on [`service::TrackerService`].
pub struct TrackerDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TrackerDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, TrackerError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| TrackerError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let tracker_db = Self { db, conn };
        tracker_db.run_migrations().await?;
        Ok(tracker_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"tkt-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, TrackerError> {
        Self::generate_id_on(&self.conn, prefix).await
    }

    /// Generate a prefixed ID on an explicit connection (or transaction).
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the query fails or returns no rows.
    pub async fn generate_id_on(
        conn: &libsql::Connection,
        prefix: &str,
    ) -> Result<String, TrackerError> {
        let mut rows = conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(TrackerError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Generate an opaque lowercase-hex secret of `nbytes * 2` characters.
    ///
    /// Used for ticket form keys, session tokens, and generated usernames.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the query fails or returns no rows.
    pub async fn generate_secret(&self, nbytes: u32) -> Result<String, TrackerError> {
        Self::generate_secret_on(&self.conn, nbytes).await
    }

    /// Generate a secret on an explicit connection (or transaction).
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the query fails or returns no rows.
    pub async fn generate_secret_on(
        conn: &libsql::Connection,
        nbytes: u32,
    ) -> Result<String, TrackerError> {
        let mut rows = conn
            .query(&format!("SELECT lower(hex(randomblob({nbytes})))"), ())
            .await?;
        let row = rows.next().await?.ok_or(TrackerError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
