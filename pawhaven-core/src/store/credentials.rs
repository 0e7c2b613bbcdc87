//! Credential verification, registration, and profile persistence.
//!
//! Wraps the user table. Secrets are stored only as Argon2id PHC strings
//! with a per-hash random salt; verification is the hash library's
//! constant-time, salt-aware comparison. A plaintext secret exists in this
//! module only transiently, on its way into the hasher.

use crate::Result;
use crate::error::PawhavenError;
use crate::models::Profile;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::NaiveDate;
use password_hash::{PasswordHash, SaltString};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use super::ShelterStore;

/// Hashes a secret with a fresh random salt, producing a PHC string.
fn hash_secret(secret: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| PawhavenError::configuration(format!("Salt generation failed: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| PawhavenError::configuration(format!("Salt encoding failed: {}", e)))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| PawhavenError::configuration(format!("Secret hashing failed: {}", e)))?
        .to_string();
    Ok(phc)
}

/// Verifies a secret against a stored PHC string. An unparseable hash
/// verifies as false rather than erroring: a corrupt row must read as
/// "wrong credentials", not take the process down.
fn verify_secret(stored_hash: &str, secret: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Access to stored credentials and profiles.
///
/// "Not found" is always a `false`/`None` result, never an error. Callers
/// branch on outcomes, and an unknown identifier is an outcome.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a credential store over the shelter database.
    pub fn new(store: &ShelterStore) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// True iff a credential exists for `identifier` and `secret` verifies
    /// against its stored hash.
    pub async fn verify(&self, identifier: &str, secret: &str) -> Result<bool> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT secret_hash FROM users WHERE identifier = ?")
                .bind(identifier)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PawhavenError::storage("Failed to look up credential", e))?;

        match stored {
            Some(hash) => Ok(verify_secret(&hash, secret)),
            None => Ok(false),
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    /// `DuplicateIdentifier` when an account already exists; storage errors
    /// when the store is unreachable.
    pub async fn register(&self, identifier: &str, secret: &str) -> Result<()> {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT identifier FROM users WHERE identifier = ?")
                .bind(identifier)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PawhavenError::storage("Failed to look up credential", e))?;
        if existing.is_some() {
            return Err(PawhavenError::duplicate_identifier(identifier));
        }

        let hash = hash_secret(secret)?;
        sqlx::query("INSERT INTO users (identifier, secret_hash) VALUES (?, ?)")
            .bind(identifier)
            .bind(&hash)
            .execute(&self.pool)
            .await
            .map_err(|e| PawhavenError::storage("Failed to insert credential", e))?;

        debug!(identifier, "registered account");
        Ok(())
    }

    /// Fetches the stored profile for `identifier`, or `None` when the
    /// identifier has no row. A registered account with no profile data
    /// yields an empty profile.
    pub async fn fetch_profile(&self, identifier: &str) -> Result<Option<Profile>> {
        let row = sqlx::query(
            "SELECT first_name, last_name, date_of_birth, living_conditions,
                    pet_experience, motivation, phone_number
             FROM users WHERE identifier = ?",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PawhavenError::storage("Failed to fetch profile", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let date_of_birth = row
            .try_get::<Option<String>, _>("date_of_birth")
            .map_err(|e| PawhavenError::storage("Failed to read profile row", e))?
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| PawhavenError::storage("Stored date of birth is malformed", e))
            })
            .transpose()?;

        let field = |name: &str| -> Result<Option<String>> {
            row.try_get::<Option<String>, _>(name)
                .map_err(|e| PawhavenError::storage("Failed to read profile row", e))
        };

        Ok(Some(Profile {
            first_name: field("first_name")?,
            last_name: field("last_name")?,
            date_of_birth,
            living_conditions: field("living_conditions")?,
            pet_experience: field("pet_experience")?,
            motivation: field("motivation")?,
            phone_number: field("phone_number")?,
        }))
    }

    /// Persists profile fields to the user row.
    ///
    /// This is the explicit "update stored profile" operation; the in-memory
    /// session is updated separately by `SessionManager::update_profile`.
    pub async fn update_profile(&self, identifier: &str, profile: &Profile) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users
             SET first_name = ?, last_name = ?, date_of_birth = ?, living_conditions = ?,
                 pet_experience = ?, motivation = ?, phone_number = ?
             WHERE identifier = ?",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(&profile.living_conditions)
        .bind(&profile.pet_experience)
        .bind(&profile.motivation)
        .bind(&profile.phone_number)
        .bind(identifier)
        .execute(&self.pool)
        .await
        .map_err(|e| PawhavenError::storage("Failed to update profile", e))?;

        if result.rows_affected() == 0 {
            // No row for the identifier; nothing to persist.
            warn!(identifier, "profile update matched no account");
        } else {
            debug!(identifier, "updated stored profile");
        }
        Ok(())
    }
}
