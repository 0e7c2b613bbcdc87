//! The adoption-request lifecycle.
//!
//! A request is one database row plus one generated document, kept
//! consistent without multi-resource transactions. The orderings here are
//! load-bearing:
//!
//! - `submit` inserts the row first, then renders the document. A crash or
//!   render failure in between leaves a row whose document is missing, a
//!   known and accepted window. The row carries the canonical path, so the
//!   reference stays discoverable and retryable; rendering first would
//!   leave an orphan file nothing points at.
//! - `cancel` deletes the file first, then the row, bounding the window to
//!   the same "row exists, file missing" shape.
//!
//! Neither operation rolls back on partial failure. `audit` is the
//! reconciliation pass that surfaces rows whose document is gone.

use crate::Result;
use crate::document::DocumentGenerator;
use crate::error::PawhavenError;
use crate::models::{AdoptionRequest, Animal};
use crate::session::{Session, SessionState};
use crate::store::{ShelterStore, requests};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Filename suffix for generated request documents
const DOCUMENT_SUFFIX: &str = "_request.txt";

/// Creates and cancels adoption requests for the active session.
pub struct AdoptionRequestService {
    pool: SqlitePool,
    generator: Arc<dyn DocumentGenerator>,
    documents_root: PathBuf,
}

impl std::fmt::Debug for AdoptionRequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdoptionRequestService")
            .field("documents_root", &self.documents_root)
            .finish_non_exhaustive()
    }
}

impl AdoptionRequestService {
    /// Creates the service over the shelter database.
    pub fn new(
        store: &ShelterStore,
        generator: Arc<dyn DocumentGenerator>,
        documents_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pool: store.pool().clone(),
            generator,
            documents_root: documents_root.into(),
        }
    }

    /// Submits an adoption request for `animal` on behalf of the active
    /// session.
    ///
    /// # Errors
    /// `NoActiveSession` with no session; `DuplicateRequest` when the pair
    /// already has a row (never two rows for one pair); `Storage` when the
    /// store or filesystem fails; `Render` when the document cannot be
    /// produced; in that last case the row already exists and is left in
    /// place for retry or reconciliation.
    pub async fn submit(
        &self,
        state: &SessionState,
        animal: &Animal,
    ) -> Result<AdoptionRequest> {
        let session = active(state)?;
        let requester = session.identifier();

        if requests::exists(&self.pool, requester, animal.id).await? {
            return Err(PawhavenError::DuplicateRequest {
                animal_id: animal.id,
            });
        }

        // Idempotent: a pre-existing directory is not an error.
        let animal_dir = self.documents_root.join(&animal.code);
        tokio::fs::create_dir_all(&animal_dir)
            .await
            .map_err(|e| PawhavenError::storage("Failed to create document directory", e))?;

        let filename = format!(
            "{}{}",
            chrono::Utc::now().timestamp_millis(),
            DOCUMENT_SUFFIX
        );
        let destination = animal_dir.join(filename);

        // Row first: it carries the canonical path.
        requests::insert(
            &self.pool,
            requester,
            animal.id,
            &destination.to_string_lossy(),
        )
        .await?;
        info!(requester, animal_id = animal.id, "adoption request recorded");

        if let Err(e) = self
            .generator
            .render(requester, session.profile(), animal, &destination)
            .await
        {
            warn!(
                requester,
                animal_id = animal.id,
                "document rendering failed; request row remains without its document"
            );
            return Err(e);
        }
        debug!(path = %destination.display(), "adoption request document written");

        Ok(AdoptionRequest {
            requester: requester.to_string(),
            animal_id: animal.id,
            document_path: destination,
        })
    }

    /// Cancels the active session's request for `animal`, deleting the
    /// document (when present; the row is authoritative) and then the row.
    ///
    /// # Errors
    /// `NoActiveSession` with no session; `NoSuchRequest` when the pair has
    /// no row; `Storage` when the store or filesystem fails.
    pub async fn cancel(&self, state: &SessionState, animal: &Animal) -> Result<()> {
        let session = active(state)?;
        let requester = session.identifier();

        let Some(document_path) = requests::find(&self.pool, requester, animal.id).await? else {
            return Err(PawhavenError::NoSuchRequest {
                animal_id: animal.id,
            });
        };

        // File before row, so a failure in between never orphans the file.
        match tokio::fs::remove_file(&document_path).await {
            Ok(()) => debug!(path = %document_path.display(), "deleted request document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %document_path.display(), "request document already absent");
            }
            Err(e) => {
                return Err(PawhavenError::storage("Failed to delete document", e));
            }
        }

        requests::delete(&self.pool, requester, animal.id).await?;
        info!(requester, animal_id = animal.id, "adoption request cancelled");
        Ok(())
    }

    /// True when a request row exists for the pair. Pure check, no side
    /// effects; the presentation layer uses it to offer submit or cancel.
    pub async fn exists(&self, identifier: &str, animal_id: i64) -> Result<bool> {
        requests::exists(&self.pool, identifier, animal_id).await
    }

    /// Reconciliation pass: returns every request row whose document is
    /// missing from disk. Surfaces mismatches left by the known partial-
    /// failure windows; changes nothing.
    pub async fn audit(&self) -> Result<Vec<AdoptionRequest>> {
        let mut missing = Vec::new();
        for request in requests::all(&self.pool).await? {
            let present = matches!(
                tokio::fs::try_exists(&request.document_path).await,
                Ok(true)
            );
            if !present {
                missing.push(request);
            }
        }
        if !missing.is_empty() {
            warn!(count = missing.len(), "request rows without documents");
        }
        Ok(missing)
    }
}

fn active(state: &SessionState) -> Result<&Session> {
    state.session().ok_or(PawhavenError::NoActiveSession)
}
