//! Error types with secret sanitization.
//!
//! All error types in this module ensure that passwords and session secrets
//! are never exposed in error messages, logs, or any output format. Variants
//! map one-to-one onto the failure kinds the application surfaces to its
//! presentation layer.

use thiserror::Error;

/// Main error type for PawHaven operations.
///
/// # Security
/// Error messages never carry a secret or a password hash. Store and
/// filesystem failures keep their source chained for diagnostics but the
/// rendered message stays free of credential material.
#[derive(Debug, Error)]
pub enum PawhavenError {
    /// Login or restore was attempted with credentials that do not verify
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration was attempted for an identifier that already exists
    #[error("An account already exists for '{identifier}'")]
    DuplicateIdentifier { identifier: String },

    /// An operation requiring an authenticated actor ran with no session
    #[error("No active session")]
    NoActiveSession,

    /// Cancellation was attempted for a (requester, animal) pair with no request
    #[error("No adoption request exists for animal {animal_id}")]
    NoSuchRequest { animal_id: i64 },

    /// Submission was attempted for a (requester, animal) pair that already has a request
    #[error("An adoption request already exists for animal {animal_id}")]
    DuplicateRequest { animal_id: i64 },

    /// Catalog insert or update would reuse an existing animal code
    #[error("An animal already exists with code '{code}'")]
    DuplicateAnimalCode { code: String },

    /// Catalog lookup for an id that has no row
    #[error("No animal exists with id {animal_id}")]
    NoSuchAnimal { animal_id: i64 },

    /// Relational store or filesystem unreachable or failing
    #[error("Storage unavailable: {context}")]
    Storage {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Document rendering failed
    #[error("Document rendering failed: {context}")]
    Render {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with PawhavenError
pub type Result<T> = std::result::Result<T, PawhavenError>;

impl PawhavenError {
    /// Creates a storage error with context
    pub fn storage<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a render error with context
    pub fn render<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Render {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a duplicate-identifier error
    pub fn duplicate_identifier(identifier: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Creates a duplicate-animal-code error
    pub fn duplicate_animal_code(code: impl Into<String>) -> Self {
        Self::DuplicateAnimalCode { code: code.into() }
    }
}
