//! # bugle-config
//!
//! Layered configuration loading for Bugle using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`BUGLE_*` prefix, `__` as separator)
//! 2. Project-level `.bugle/config.toml`
//! 3. User-level `~/.config/bugle/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `BUGLE_DATABASE__PATH` -> `database.path`,
//! `BUGLE_INTAKE__VALIDATION` -> `intake.validation`, etc. The `__`
//! (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use bugle_config::BugleConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = BugleConfig::load_with_dotenv().expect("config");
//! println!("database at {}", config.database.path);
//! ```

mod database;
mod error;
mod intake;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use intake::{IntakeConfig, ValidationMode};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BugleConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

impl BugleConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for servers and
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".bugle/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("BUGLE_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bugle").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = BugleConfig::default();
        assert_eq!(config.database.path, "bugle.db");
        assert_eq!(config.intake.validation, ValidationMode::Lenient);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: BugleConfig = BugleConfig::figment().extract()?;
            assert_eq!(config.database.path, "bugle.db");
            assert_eq!(config.intake.validation, ValidationMode::Lenient);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BUGLE_DATABASE__PATH", "/tmp/override.db");
            jail.set_env("BUGLE_INTAKE__VALIDATION", "strict");
            let config: BugleConfig = BugleConfig::figment().extract()?;
            assert_eq!(config.database.path, "/tmp/override.db");
            assert_eq!(config.intake.validation, ValidationMode::Strict);
            Ok(())
        });
    }
}
