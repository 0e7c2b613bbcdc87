//! SQLite connection handling for the shelter store.
//!
//! The store is file-based and single-user, so connection handling is
//! simple: one validated connection string, one pooled connection. The
//! database file is created on first run.
//!
//! # Connection Modes
//! - File-based: `sqlite:///path/to/shelter.db` or a plain `.db` path
//! - In-memory: `sqlite::memory:` or `:memory:` (used by the test suites)

use crate::Result;
use crate::error::PawhavenError;
use sqlx::SqlitePool;
use url::Url;

/// Validates a SQLite connection string.
///
/// # Errors
/// Returns a configuration error when the string is neither a `sqlite:`
/// URL, a `.db`/`.sqlite`/`.sqlite3` file path, nor `:memory:`.
pub fn validate_connection_string(connection_string: &str) -> Result<()> {
    if connection_string == ":memory:" {
        return Ok(());
    }

    if connection_string.ends_with(".db")
        || connection_string.ends_with(".sqlite")
        || connection_string.ends_with(".sqlite3")
    {
        return Ok(());
    }

    if connection_string.starts_with("sqlite:") {
        if connection_string.contains(":memory:") || connection_string.contains("mode=memory") {
            return Ok(());
        }

        if let Ok(url) = Url::parse(connection_string) {
            if url.scheme() != "sqlite" {
                return Err(PawhavenError::configuration(
                    "Connection string must use sqlite:// scheme",
                ));
            }
            return Ok(());
        }

        if connection_string.starts_with("sqlite://") {
            return Ok(());
        }
    }

    Err(PawhavenError::configuration(
        "Invalid SQLite connection string: expected sqlite:// URL, file path, or :memory:",
    ))
}

/// Normalizes a connection string to SQLite URL format.
pub fn normalize_connection_string(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        return "sqlite::memory:".to_string();
    }

    if connection_string.starts_with("sqlite:") {
        return connection_string.to_string();
    }

    format!("sqlite://{}", connection_string)
}

/// Opens the single-connection pool behind the store.
///
/// The pool is capped at one connection: the process is single-user and
/// SQLite needs no pooling, and a single connection keeps in-memory
/// databases coherent across sequential statements.
pub(super) async fn create_pool(connection_string: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::SqliteConnectOptions;
    use std::str::FromStr;

    validate_connection_string(connection_string)?;
    let normalized = normalize_connection_string(connection_string);

    let options = SqliteConnectOptions::from_str(&normalized)
        .map_err(|e| {
            PawhavenError::configuration(format!("Invalid SQLite connection string: {}", e))
        })?
        .create_if_missing(true);

    // The one connection is held open for the life of the pool; letting it
    // idle out would wipe an in-memory database between statements.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| PawhavenError::storage("Failed to open SQLite database", e))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_connection_string_memory() {
        assert!(validate_connection_string(":memory:").is_ok());
        assert!(validate_connection_string("sqlite::memory:").is_ok());
        assert!(validate_connection_string("sqlite://:memory:").is_ok());
    }

    #[test]
    fn test_validate_connection_string_file() {
        assert!(validate_connection_string("sqlite:///var/lib/pawhaven/shelter.db").is_ok());
        assert!(validate_connection_string("sqlite://./shelter.db").is_ok());
        assert!(validate_connection_string("/var/lib/pawhaven/shelter.db").is_ok());
        assert!(validate_connection_string("./local.sqlite").is_ok());
        assert!(validate_connection_string("data.sqlite3").is_ok());
    }

    #[test]
    fn test_validate_connection_string_invalid() {
        assert!(validate_connection_string("postgres://localhost/db").is_err());
        assert!(validate_connection_string("mysql://localhost/db").is_err());
        assert!(validate_connection_string("invalid").is_err());
    }

    #[test]
    fn test_normalize_connection_string() {
        assert_eq!(normalize_connection_string(":memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_connection_string("sqlite:///path/shelter.db"),
            "sqlite:///path/shelter.db"
        );
        assert_eq!(
            normalize_connection_string("/path/to/shelter.db"),
            "sqlite:///path/to/shelter.db"
        );
    }
}
