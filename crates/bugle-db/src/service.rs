//! Service layer hosting all tracker operations.
//!
//! `TrackerService` wraps `TrackerDb` (raw database access) plus the intake
//! validation mode from configuration. All repo methods are implemented as
//! `impl TrackerService` blocks in `repos::*`.

use bugle_config::{BugleConfig, ValidationMode};

use crate::TrackerDb;
use crate::error::TrackerError;

/// Orchestrates tracker mutations and role-gated reads.
///
/// Mutations that touch more than one row (project creation, ticket
/// reassignment) run inside a transaction on the wrapped connection;
/// everything else is a single statement.
pub struct TrackerService {
    db: TrackerDb,
    intake_validation: ValidationMode,
}

impl TrackerService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for
    ///   tests.
    /// * `intake_validation` — Label validation mode for structured ticket
    ///   fields (see `bugle_config::ValidationMode`).
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the database cannot be opened.
    pub async fn new_local(
        db_path: &str,
        intake_validation: ValidationMode,
    ) -> Result<Self, TrackerError> {
        let db = TrackerDb::open_local(db_path).await?;
        Ok(Self {
            db,
            intake_validation,
        })
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the configured database cannot be opened.
    pub async fn from_config(config: &BugleConfig) -> Result<Self, TrackerError> {
        Self::new_local(&config.database.path, config.intake.validation).await
    }

    /// Create from an existing `TrackerDb` (for testing).
    #[must_use]
    pub const fn from_db(db: TrackerDb, intake_validation: ValidationMode) -> Self {
        Self {
            db,
            intake_validation,
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TrackerDb {
        &self.db
    }

    /// The configured label validation mode for ticket intake.
    #[must_use]
    pub const fn intake_validation(&self) -> ValidationMode {
        self.intake_validation
    }
}
