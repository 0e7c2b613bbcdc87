//! Command handlers behind the CLI surface.
//!
//! Each handler drives one core operation and prints a short, user-facing
//! result. Secrets are collected through hidden prompts and handed straight
//! to the core; they are never printed or logged.

use crate::{AddAnimalArgs, ProfileArgs};
use anyhow::{Context, bail};
use pawhaven_core::{
    AdoptionRequestService, Animal, AppConfig, Catalog, CredentialStore, NewAnimal, Profile,
    SessionManager, ShelterStore, TemplateDocumentGenerator,
};
use std::sync::Arc;
use tracing::info;

/// Builds the adoption-request service over the opened store.
pub fn request_service(store: &ShelterStore, config: &AppConfig) -> AdoptionRequestService {
    AdoptionRequestService::new(
        store,
        Arc::new(TemplateDocumentGenerator),
        config.documents_root.clone(),
    )
}

/// Registers a new account after validating the form input.
pub async fn register(credentials: &CredentialStore, identifier: &str) -> anyhow::Result<()> {
    let secret = rpassword::prompt_password("Choose a password: ")
        .context("Failed to read password")?;
    let confirmation = rpassword::prompt_password("Confirm the password: ")
        .context("Failed to read password confirmation")?;

    if !SessionManager::validate_registration(identifier, &secret, &confirmation) {
        bail!("Registration data is invalid: check the email address and that both passwords match");
    }

    credentials.register(identifier, &secret).await?;
    println!("Account created for {}", identifier);
    println!("Log in with: pawhaven login {}", identifier);
    Ok(())
}

/// Logs in, overwriting any previously persisted session.
pub async fn login(manager: &mut SessionManager, identifier: &str) -> anyhow::Result<()> {
    let secret = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    manager.login(identifier, &secret).await?;
    println!("Logged in as {}", manager.identifier());
    Ok(())
}

/// Clears the persisted session.
pub async fn logout(manager: &mut SessionManager) -> anyhow::Result<()> {
    manager.logout().await?;
    println!("Logged out");
    Ok(())
}

/// Prints the session state and profile.
pub fn whoami(manager: &SessionManager) {
    if !manager.state().is_active() {
        println!("Not logged in");
        return;
    }

    println!("Logged in as:      {}", manager.identifier());
    println!("Name:              {} {}", manager.first_name(), manager.last_name());
    match manager.date_of_birth() {
        Some(date) => println!("Date of birth:     {}", date),
        None => println!("Date of birth:     ?"),
    }
    println!("Phone number:      {}", manager.phone_number());
    println!("Living conditions: {}", manager.living_conditions());
    println!("Pet experience:    {}", manager.pet_experience());
    println!("Motivation:        {}", manager.motivation());
}

/// Updates the in-memory profile and persists it to the store.
pub async fn update_profile(
    manager: &mut SessionManager,
    credentials: &CredentialStore,
    args: ProfileArgs,
) -> anyhow::Result<()> {
    if !manager.state().is_active() {
        bail!("Log in before updating the profile");
    }

    // Start from the current profile and overlay the provided fields.
    let current = manager
        .state()
        .session()
        .map(|session| session.profile().clone())
        .unwrap_or_default();
    let profile = Profile {
        first_name: args.first_name.or(current.first_name),
        last_name: args.last_name.or(current.last_name),
        date_of_birth: args.date_of_birth.or(current.date_of_birth),
        living_conditions: args.living_conditions.or(current.living_conditions),
        pet_experience: args.pet_experience.or(current.pet_experience),
        motivation: args.motivation.or(current.motivation),
        phone_number: args.phone_number.or(current.phone_number),
    };

    // Session first, then the explicit store write.
    let identifier = manager.identifier().to_string();
    manager.update_profile(profile.clone())?;
    credentials.update_profile(&identifier, &profile).await?;

    println!("Profile updated");
    Ok(())
}

/// Lists the catalog.
pub async fn list_animals(catalog: &Catalog) -> anyhow::Result<()> {
    let animals = catalog.all().await?;
    if animals.is_empty() {
        println!("The catalog is empty");
        return Ok(());
    }

    for animal in &animals {
        println!(
            "{:<10} {} ({}), {} years, {}, {} - {}",
            animal.code,
            animal.species,
            animal.breed,
            animal.age,
            animal.gender,
            animal.size,
            animal.description,
        );
    }
    println!("{} animal(s)", animals.len());
    Ok(())
}

/// Adds an animal to the catalog.
pub async fn add_animal(catalog: &Catalog, args: AddAnimalArgs) -> anyhow::Result<()> {
    let animal = catalog
        .insert(NewAnimal {
            code: args.code,
            species: args.species,
            breed: args.breed,
            age: args.age,
            gender: args.gender,
            size: args.size,
            description: args.description,
            image_path: args.image_path,
        })
        .await?;

    println!("Added {} with id {}", animal.code, animal.id);
    Ok(())
}

/// Removes an animal from the catalog.
pub async fn remove_animal(catalog: &Catalog, code: &str) -> anyhow::Result<()> {
    let animal = find_by_code(catalog, code).await?;
    catalog.delete(animal.id).await?;
    println!("Removed {}", animal.code);
    Ok(())
}

/// Submits an adoption request for the animal with `code`.
pub async fn submit_request(
    service: &AdoptionRequestService,
    manager: &SessionManager,
    catalog: &Catalog,
    code: &str,
) -> anyhow::Result<()> {
    let animal = find_by_code(catalog, code).await?;
    let request = service.submit(manager.state(), &animal).await?;

    info!(requester = %request.requester, code, "request submitted");
    println!(
        "Request submitted; document at {}",
        request.document_path.display()
    );
    Ok(())
}

/// Cancels the adoption request for the animal with `code`.
pub async fn cancel_request(
    service: &AdoptionRequestService,
    manager: &SessionManager,
    catalog: &Catalog,
    code: &str,
) -> anyhow::Result<()> {
    let animal = find_by_code(catalog, code).await?;
    service.cancel(manager.state(), &animal).await?;
    println!("Request for {} cancelled", animal.code);
    Ok(())
}

/// Prints request rows whose document is missing.
pub async fn audit_requests(service: &AdoptionRequestService) -> anyhow::Result<()> {
    let missing = service.audit().await?;
    if missing.is_empty() {
        println!("All request documents are present");
        return Ok(());
    }

    println!("{} request(s) missing their document:", missing.len());
    for request in &missing {
        println!(
            "  {} / animal {} -> {}",
            request.requester,
            request.animal_id,
            request.document_path.display()
        );
    }
    println!("Re-submit after cancelling, or restore the files from backup");
    Ok(())
}

async fn find_by_code(catalog: &Catalog, code: &str) -> anyhow::Result<Animal> {
    catalog
        .find_by_code(code)
        .await?
        .with_context(|| format!("No animal in the catalog has code '{}'", code))
}
