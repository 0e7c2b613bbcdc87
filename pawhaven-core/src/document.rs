//! Adoption-request document rendering.
//!
//! The adoption service talks to a `DocumentGenerator` trait so the
//! rendering backend stays swappable (and so the failure path can be
//! exercised in tests). The default implementation renders a fixed-layout
//! plain-text document through an askama template: requester details,
//! animal details, an image reference, and a static footer.

use crate::Result;
use crate::error::PawhavenError;
use crate::models::{Animal, Profile};
use crate::session::UNKNOWN;
use askama::Template;
use async_trait::async_trait;
use std::path::Path;

/// Renders the adoption-request document for one (requester, animal) pair.
///
/// A failed render reports an error and leaves nothing half-consumed; the
/// caller decides what to do with the already-written database row.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Renders the document to `destination`.
    async fn render(
        &self,
        identifier: &str,
        profile: &Profile,
        animal: &Animal,
        destination: &Path,
    ) -> Result<()>;
}

#[derive(Template)]
#[template(path = "adoption_request.txt")]
struct AdoptionRequestDocument<'a> {
    requester_name: String,
    email: &'a str,
    phone_number: &'a str,
    living_conditions: &'a str,
    pet_experience: &'a str,
    motivation: &'a str,
    code: &'a str,
    species: &'a str,
    breed: &'a str,
    age: u32,
    gender: String,
    size: String,
    description: &'a str,
    image_line: String,
}

impl<'a> AdoptionRequestDocument<'a> {
    fn new(identifier: &'a str, profile: &'a Profile, animal: &'a Animal) -> Self {
        let requester_name = format!(
            "{} {}",
            profile.first_name.as_deref().unwrap_or(UNKNOWN),
            profile.last_name.as_deref().unwrap_or(UNKNOWN),
        );

        let image_line = match animal.image_path.as_deref() {
            Some(path) if Path::new(path).exists() => format!("Image: {}", path),
            Some(path) => format!("Animal image not found at: {}", path),
            None => "No image provided for this animal.".to_string(),
        };

        Self {
            requester_name,
            email: identifier,
            phone_number: profile.phone_number.as_deref().unwrap_or(UNKNOWN),
            living_conditions: profile.living_conditions.as_deref().unwrap_or(UNKNOWN),
            pet_experience: profile.pet_experience.as_deref().unwrap_or(UNKNOWN),
            motivation: profile.motivation.as_deref().unwrap_or(UNKNOWN),
            code: &animal.code,
            species: &animal.species,
            breed: &animal.breed,
            age: animal.age,
            gender: animal.gender.to_string(),
            size: animal.size.to_string(),
            description: &animal.description,
            image_line,
        }
    }
}

/// The default, template-backed document generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDocumentGenerator;

#[async_trait]
impl DocumentGenerator for TemplateDocumentGenerator {
    async fn render(
        &self,
        identifier: &str,
        profile: &Profile,
        animal: &Animal,
        destination: &Path,
    ) -> Result<()> {
        let text = AdoptionRequestDocument::new(identifier, profile, animal)
            .render()
            .map_err(|e| PawhavenError::render("Template rendering failed", e))?;

        tokio::fs::write(destination, text)
            .await
            .map_err(|e| PawhavenError::render("Failed to write document", e))?;

        Ok(())
    }
}
