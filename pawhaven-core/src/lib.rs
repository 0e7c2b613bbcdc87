//! Core library for the PawHaven shelter application.
//!
//! This crate provides the session and adoption-request subsystem behind
//! whatever presentation layer exists: credential verification, session
//! persistence and restoration, the animal catalog, and the adoption-request
//! lifecycle that keeps a database row and a generated document consistent.
//!
//! # Security Guarantees
//! - Secrets are stored only as salted Argon2id hashes, never in clear form
//! - In-memory secrets live in zeroizing containers
//! - Every store statement is parameterized
//! - The persisted session record is an untrusted cache, re-verified against
//!   the credential store on every restore
//!
//! # Architecture
//! The core is invoked through plain function calls; components own their
//! state explicitly:
//! - `SessionManager` owns the single current session and its persistence
//! - `AdoptionRequestService` owns the row/document consistency rules
//! - `store` wraps SQLite behind independent single-statement operations

pub mod adoption;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use adoption::AdoptionRequestService;
pub use config::AppConfig;
pub use document::{DocumentGenerator, TemplateDocumentGenerator};
pub use error::{PawhavenError, Result};
pub use logging::init_logging;
pub use models::{AdoptionRequest, Animal, Gender, NewAnimal, Profile, SizeCategory};
pub use session::{Session, SessionManager, SessionRecord, SessionState, UNKNOWN};
pub use store::{Catalog, CredentialStore, ShelterStore};
