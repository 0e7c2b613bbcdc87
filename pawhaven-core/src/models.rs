//! Core data models for the shelter application.
//!
//! This module defines the domain types shared between the store, the
//! session layer, and the adoption-request service. All models are
//! serializable; none of them ever carries a secret.

use crate::error::PawhavenError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Animal gender as recorded in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = PawhavenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(PawhavenError::configuration(format!(
                "Unknown gender '{}': expected male or female",
                other
            ))),
        }
    }
}

/// Size category used by the catalog to describe an animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeCategory::Small => write!(f, "Small"),
            SizeCategory::Medium => write!(f, "Medium"),
            SizeCategory::Large => write!(f, "Large"),
        }
    }
}

impl std::str::FromStr for SizeCategory {
    type Err = PawhavenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(SizeCategory::Small),
            "medium" | "m" => Ok(SizeCategory::Medium),
            "large" | "l" => Ok(SizeCategory::Large),
            other => Err(PawhavenError::configuration(format!(
                "Unknown size category '{}': expected small, medium or large",
                other
            ))),
        }
    }
}

/// An adoptable animal as stored in the catalog.
///
/// `id` is assigned by the store; `code` is the human-facing identifier
/// assigned by shelter staff and unique across the catalog. Adoption-request
/// documents are grouped in a directory named after `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    /// Store-assigned numeric identifier
    pub id: i64,
    /// Unique, staff-assigned animal code
    pub code: String,
    pub species: String,
    pub breed: String,
    /// Age in whole years, never negative
    pub age: u32,
    pub gender: Gender,
    pub size: SizeCategory,
    pub description: String,
    /// Optional path to a photo; read-only to this crate
    pub image_path: Option<String>,
}

/// Catalog entry before the store has assigned an id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnimal {
    pub code: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub gender: Gender,
    pub size: SizeCategory,
    pub description: String,
    pub image_path: Option<String>,
}

/// Profile data attached to a registered account.
///
/// Every field is optional: a fresh account has credentials and nothing
/// else, and the profile fills in as the user edits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub living_conditions: Option<String>,
    pub pet_experience: Option<String>,
    pub motivation: Option<String>,
    pub phone_number: Option<String>,
}

impl Profile {
    /// True when no field has been filled in yet
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.date_of_birth.is_none()
            && self.living_conditions.is_none()
            && self.pet_experience.is_none()
            && self.motivation.is_none()
            && self.phone_number.is_none()
    }
}

/// One adoption request: a requester paired with an animal, backed by a
/// store row and a generated document at `document_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionRequest {
    /// Identifier (email) of the requesting account
    pub requester: String,
    /// Store id of the requested animal
    pub animal_id: i64,
    /// Destination of the rendered request document
    pub document_path: PathBuf,
}
