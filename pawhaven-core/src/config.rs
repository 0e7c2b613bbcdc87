//! Application configuration.
//!
//! The core needs three locations: the relational store, the session record
//! file, and the root directory for generated adoption-request documents.
//! The presentation layer supplies them (CLI flags with env fallbacks); this
//! module only validates and carries them.

use crate::error::PawhavenError;
use crate::Result;
use std::path::PathBuf;

/// Locations the core operates on
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string (`sqlite://...`, a `.db` path, or `:memory:`)
    pub database_url: String,
    /// Two-line session record file
    pub session_file: PathBuf,
    /// Root directory for generated adoption-request documents
    pub documents_root: PathBuf,
}

impl AppConfig {
    /// Creates a configuration and validates it.
    ///
    /// # Errors
    /// Returns a configuration error when the database URL is empty or a
    /// path is empty.
    pub fn new(
        database_url: impl Into<String>,
        session_file: impl Into<PathBuf>,
        documents_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let config = Self {
            database_url: database_url.into(),
            session_file: session_file.into(),
            documents_root: documents_root.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database_url.is_empty() {
            return Err(PawhavenError::configuration("Database URL is empty"));
        }
        if self.session_file.as_os_str().is_empty() {
            return Err(PawhavenError::configuration("Session file path is empty"));
        }
        if self.documents_root.as_os_str().is_empty() {
            return Err(PawhavenError::configuration("Documents root is empty"));
        }
        Ok(())
    }
}
