//! SQLite-backed relational store.
//!
//! # Module Structure
//! - `connection`: connection-string validation and the single-connection pool
//! - `credentials`: user table (credential verification, registration, profiles)
//! - `animals`: animal catalog CRUD
//! - `requests`: adoption-request rows
//!
//! Every statement is parameterized; nothing in this module interpolates
//! caller input into SQL text. The store offers independent single-statement
//! operations only; there are no multi-statement transactions, and the
//! layers above are designed around that.

pub mod animals;
pub mod connection;
pub mod credentials;
pub mod requests;

use crate::Result;
use crate::error::PawhavenError;
use sqlx::SqlitePool;

pub use animals::Catalog;
pub use credentials::CredentialStore;

/// Handle to the shelter database.
///
/// Opening the store validates the connection string, creates the database
/// file when missing, and bootstraps the schema. The pool is shared by the
/// credential store, the catalog, and the adoption-request service through
/// cheap clones.
pub struct ShelterStore {
    pool: SqlitePool,
}

impl std::fmt::Debug for ShelterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShelterStore").finish_non_exhaustive()
    }
}

impl ShelterStore {
    /// Opens the store at `database_url` and ensures the schema exists.
    ///
    /// # Errors
    /// Returns a configuration error for an invalid connection string, or a
    /// storage error when the database cannot be opened or bootstrapped.
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = connection::create_pool(database_url).await?;
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks that the store answers a trivial query.
    pub async fn is_healthy(&self) -> bool {
        matches!(
            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(&self.pool)
                .await,
            Ok(1)
        )
    }

    /// Closes the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Creates the tables on first run; a no-op afterwards.
///
/// `adoption_requests` deliberately carries no UNIQUE constraint on
/// (requester, animal_id): pair uniqueness is enforced by the existence
/// check in the adoption service, and the store stays a plain set of
/// single-statement operations.
async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS users (
            identifier TEXT PRIMARY KEY,
            secret_hash TEXT NOT NULL,
            first_name TEXT,
            last_name TEXT,
            date_of_birth TEXT,
            living_conditions TEXT,
            pet_experience TEXT,
            motivation TEXT,
            phone_number TEXT
        )",
        "CREATE TABLE IF NOT EXISTS animals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            species TEXT NOT NULL,
            breed TEXT NOT NULL,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL,
            size TEXT NOT NULL,
            description TEXT NOT NULL,
            image_path TEXT
        )",
        "CREATE TABLE IF NOT EXISTS adoption_requests (
            requester TEXT NOT NULL,
            animal_id INTEGER NOT NULL,
            document_path TEXT NOT NULL
        )",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| PawhavenError::storage("Failed to bootstrap schema", e))?;
    }

    Ok(())
}
