//! The persisted session record.
//!
//! A two-line text file (identifier, then secret) at a configured location.
//! An empty pair means "no session". The record is an optimistic cache:
//! its contents are re-verified against the credential store on every
//! process start and are never trusted by themselves.

use crate::Result;
use crate::error::PawhavenError;
use std::path::{Path, PathBuf};
use tracing::debug;
use zeroize::Zeroizing;

/// Handle to the session record file
#[derive(Debug, Clone)]
pub struct SessionRecord {
    path: PathBuf,
}

impl SessionRecord {
    /// Creates a handle; the file itself is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted pair.
    ///
    /// Returns `None` when the file is absent, does not hold exactly two
    /// lines, or either line is empty; all of these mean "no persisted
    /// session", never an error. I/O failures other than absence do error.
    pub async fn read(&self) -> Result<Option<(String, Zeroizing<String>)>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PawhavenError::io("Failed to read session record", e)),
        };

        let lines: Vec<&str> = content.lines().collect();
        if lines.len() != 2 || lines[0].is_empty() || lines[1].is_empty() {
            debug!(path = %self.path.display(), "session record absent or malformed");
            return Ok(None);
        }

        Ok(Some((
            lines[0].to_string(),
            Zeroizing::new(lines[1].to_string()),
        )))
    }

    /// Overwrites the record with an identifier/secret pair.
    pub async fn write(&self, identifier: &str, secret: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| PawhavenError::io("Failed to create session directory", e))?;
            }
        }
        tokio::fs::write(&self.path, format!("{}\n{}", identifier, secret))
            .await
            .map_err(|e| PawhavenError::io("Failed to write session record", e))?;
        Ok(())
    }

    /// Clears the record by writing an empty pair.
    pub async fn clear(&self) -> Result<()> {
        self.write("", "").await
    }
}
