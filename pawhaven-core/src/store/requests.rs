//! Adoption-request rows.
//!
//! Plain single-statement operations over the `adoption_requests` table.
//! Pair uniqueness and the row/document consistency rules live in the
//! adoption service; this module only moves rows.

use crate::Result;
use crate::error::PawhavenError;
use crate::models::AdoptionRequest;
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;

/// Inserts a request row referencing the computed document path.
pub async fn insert(
    pool: &SqlitePool,
    requester: &str,
    animal_id: i64,
    document_path: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO adoption_requests (requester, animal_id, document_path) VALUES (?, ?, ?)",
    )
    .bind(requester)
    .bind(animal_id)
    .bind(document_path)
    .execute(pool)
    .await
    .map_err(|e| PawhavenError::storage("Failed to insert adoption request", e))?;
    Ok(())
}

/// Deletes the row for a (requester, animal) pair.
pub async fn delete(pool: &SqlitePool, requester: &str, animal_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM adoption_requests WHERE requester = ? AND animal_id = ?")
        .bind(requester)
        .bind(animal_id)
        .execute(pool)
        .await
        .map_err(|e| PawhavenError::storage("Failed to delete adoption request", e))?;
    Ok(())
}

/// Returns the stored document path for a pair, or `None` when no row exists.
pub async fn find(pool: &SqlitePool, requester: &str, animal_id: i64) -> Result<Option<PathBuf>> {
    let path: Option<String> = sqlx::query_scalar(
        "SELECT document_path FROM adoption_requests WHERE requester = ? AND animal_id = ?",
    )
    .bind(requester)
    .bind(animal_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| PawhavenError::storage("Failed to look up adoption request", e))?;
    Ok(path.map(PathBuf::from))
}

/// Pure existence check for a pair.
pub async fn exists(pool: &SqlitePool, requester: &str, animal_id: i64) -> Result<bool> {
    Ok(find(pool, requester, animal_id).await?.is_some())
}

/// Lists every request row; used by the reconciliation pass.
pub async fn all(pool: &SqlitePool) -> Result<Vec<AdoptionRequest>> {
    let rows = sqlx::query("SELECT requester, animal_id, document_path FROM adoption_requests")
        .fetch_all(pool)
        .await
        .map_err(|e| PawhavenError::storage("Failed to list adoption requests", e))?;

    rows.iter()
        .map(|row| {
            let read = |e: sqlx::Error| PawhavenError::storage("Failed to read request row", e);
            Ok(AdoptionRequest {
                requester: row.try_get("requester").map_err(read)?,
                animal_id: row.try_get("animal_id").map_err(read)?,
                document_path: PathBuf::from(row.try_get::<String, _>("document_path").map_err(read)?),
            })
        })
        .collect()
}
