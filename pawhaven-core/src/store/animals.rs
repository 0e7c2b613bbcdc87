//! Animal catalog CRUD.
//!
//! The catalog has one invariant of its own, animal-code uniqueness, and
//! nothing else. The adoption service only ever reads from it by id.

use crate::Result;
use crate::error::PawhavenError;
use crate::models::{Animal, NewAnimal};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

use super::ShelterStore;

/// Access to the animal catalog
#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

fn map_animal(row: &SqliteRow) -> Result<Animal> {
    let read = |e: sqlx::Error| PawhavenError::storage("Failed to read animal row", e);

    let age: i64 = row.try_get("age").map_err(read)?;
    let age = u32::try_from(age)
        .map_err(|e| PawhavenError::storage("Stored animal age is out of range", e))?;

    let gender: String = row.try_get("gender").map_err(read)?;
    let size: String = row.try_get("size").map_err(read)?;

    Ok(Animal {
        id: row.try_get("id").map_err(read)?,
        code: row.try_get("code").map_err(read)?,
        species: row.try_get("species").map_err(read)?,
        breed: row.try_get("breed").map_err(read)?,
        age,
        gender: crate::models::Gender::from_str(&gender)?,
        size: crate::models::SizeCategory::from_str(&size)?,
        description: row.try_get("description").map_err(read)?,
        image_path: row.try_get("image_path").map_err(read)?,
    })
}

impl Catalog {
    /// Creates a catalog handle over the shelter database.
    pub fn new(store: &ShelterStore) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Inserts a new animal and returns it with its store-assigned id.
    ///
    /// # Errors
    /// `DuplicateAnimalCode` when the code is already in use.
    pub async fn insert(&self, animal: NewAnimal) -> Result<Animal> {
        if self.find_by_code(&animal.code).await?.is_some() {
            return Err(PawhavenError::duplicate_animal_code(&animal.code));
        }

        let result = sqlx::query(
            "INSERT INTO animals (code, species, breed, age, gender, size, description, image_path)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&animal.code)
        .bind(&animal.species)
        .bind(&animal.breed)
        .bind(i64::from(animal.age))
        .bind(animal.gender.to_string())
        .bind(animal.size.to_string())
        .bind(&animal.description)
        .bind(&animal.image_path)
        .execute(&self.pool)
        .await
        .map_err(|e| PawhavenError::storage("Failed to insert animal", e))?;

        let id = result.last_insert_rowid();
        debug!(code = %animal.code, id, "added animal to catalog");

        Ok(Animal {
            id,
            code: animal.code,
            species: animal.species,
            breed: animal.breed,
            age: animal.age,
            gender: animal.gender,
            size: animal.size,
            description: animal.description,
            image_path: animal.image_path,
        })
    }

    /// Looks up an animal by its store id.
    pub async fn find(&self, id: i64) -> Result<Option<Animal>> {
        let row = sqlx::query("SELECT * FROM animals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PawhavenError::storage("Failed to look up animal", e))?;
        row.as_ref().map(map_animal).transpose()
    }

    /// Looks up an animal by its staff-assigned code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Animal>> {
        let row = sqlx::query("SELECT * FROM animals WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PawhavenError::storage("Failed to look up animal", e))?;
        row.as_ref().map(map_animal).transpose()
    }

    /// Lists the whole catalog, ordered by id.
    pub async fn all(&self) -> Result<Vec<Animal>> {
        let rows = sqlx::query("SELECT * FROM animals ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PawhavenError::storage("Failed to list animals", e))?;
        rows.iter().map(map_animal).collect()
    }

    /// Updates an existing animal in place.
    ///
    /// # Errors
    /// `NoSuchAnimal` when the id has no row; `DuplicateAnimalCode` when the
    /// update would reuse another animal's code.
    pub async fn update(&self, animal: &Animal) -> Result<()> {
        if let Some(existing) = self.find_by_code(&animal.code).await? {
            if existing.id != animal.id {
                return Err(PawhavenError::duplicate_animal_code(&animal.code));
            }
        }

        let result = sqlx::query(
            "UPDATE animals
             SET code = ?, species = ?, breed = ?, age = ?, gender = ?, size = ?,
                 description = ?, image_path = ?
             WHERE id = ?",
        )
        .bind(&animal.code)
        .bind(&animal.species)
        .bind(&animal.breed)
        .bind(i64::from(animal.age))
        .bind(animal.gender.to_string())
        .bind(animal.size.to_string())
        .bind(&animal.description)
        .bind(&animal.image_path)
        .bind(animal.id)
        .execute(&self.pool)
        .await
        .map_err(|e| PawhavenError::storage("Failed to update animal", e))?;

        if result.rows_affected() == 0 {
            return Err(PawhavenError::NoSuchAnimal {
                animal_id: animal.id,
            });
        }
        Ok(())
    }

    /// Removes an animal from the catalog.
    ///
    /// # Errors
    /// `NoSuchAnimal` when the id has no row.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM animals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PawhavenError::storage("Failed to delete animal", e))?;

        if result.rows_affected() == 0 {
            return Err(PawhavenError::NoSuchAnimal { animal_id: id });
        }
        debug!(id, "removed animal from catalog");
        Ok(())
    }
}
