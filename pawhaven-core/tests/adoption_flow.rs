//! Adoption-request lifecycle integration tests.
//!
//! This test suite covers:
//! - submit → exists → cancel for one (requester, animal) pair
//! - Pair uniqueness: a second submit never creates a second row
//! - Cancellation without a prior request
//! - The accepted partial-failure window: a render failure leaves the row,
//!   the audit pass surfaces it, and cancel still cleans it up
//!
//! Note: stores are in-memory SQLite; document roots are temp directories.

use pawhaven_core::{
    AdoptionRequestService, Animal, Catalog, CredentialStore, DocumentGenerator, Gender,
    NewAnimal, PawhavenError, Profile, SessionManager, SessionRecord, ShelterStore, SizeCategory,
    TemplateDocumentGenerator,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    store: ShelterStore,
    docs: TempDir,
    // Held so the session record file outlives the manager.
    _session_dir: TempDir,
    manager: SessionManager,
    animal: Animal,
}

async fn fixture() -> Fixture {
    let store = ShelterStore::open(":memory:")
        .await
        .expect("in-memory store opens");
    let docs = tempfile::tempdir().unwrap();
    let session_dir = tempfile::tempdir().unwrap();

    let credentials = CredentialStore::new(&store);
    credentials.register("a@b.com", "p").await.unwrap();

    let mut manager = SessionManager::new(
        credentials,
        SessionRecord::new(session_dir.path().join("session.txt")),
    );
    manager.login("a@b.com", "p").await.unwrap();

    let animal = Catalog::new(&store)
        .insert(NewAnimal {
            code: "DOG-007".to_string(),
            species: "Dog".to_string(),
            breed: "Beagle".to_string(),
            age: 3,
            gender: Gender::Male,
            size: SizeCategory::Medium,
            description: "Friendly, good with children".to_string(),
            image_path: None,
        })
        .await
        .unwrap();

    Fixture {
        store,
        docs,
        _session_dir: session_dir,
        manager,
        animal,
    }
}

fn service(fixture: &Fixture) -> AdoptionRequestService {
    AdoptionRequestService::new(
        &fixture.store,
        Arc::new(TemplateDocumentGenerator),
        fixture.docs.path(),
    )
}

/// Generator that always fails, simulating a crash between the row insert
/// and the document write.
struct FailingGenerator;

#[async_trait::async_trait]
impl DocumentGenerator for FailingGenerator {
    async fn render(
        &self,
        _identifier: &str,
        _profile: &Profile,
        _animal: &Animal,
        _destination: &Path,
    ) -> pawhaven_core::Result<()> {
        Err(PawhavenError::render(
            "Simulated rendering failure",
            std::io::Error::other("boom"),
        ))
    }
}

// =============================================================================
// Happy Path Tests
// =============================================================================

#[tokio::test]
async fn test_submit_then_exists_then_cancel() {
    let fixture = fixture().await;
    let service = service(&fixture);

    let request = service
        .submit(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap();
    assert!(service.exists("a@b.com", fixture.animal.id).await.unwrap());

    // The document landed in the per-animal directory and mentions the animal.
    assert!(request.document_path.starts_with(fixture.docs.path().join("DOG-007")));
    let text = tokio::fs::read_to_string(&request.document_path)
        .await
        .unwrap();
    assert!(text.contains("DOG-007"));
    assert!(text.contains("a@b.com"));

    service
        .cancel(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap();
    assert!(!service.exists("a@b.com", fixture.animal.id).await.unwrap());
    assert!(!request.document_path.exists());
}

#[tokio::test]
async fn test_submit_tolerates_existing_animal_directory() {
    let fixture = fixture().await;
    let service = service(&fixture);

    tokio::fs::create_dir_all(fixture.docs.path().join("DOG-007"))
        .await
        .unwrap();

    assert!(
        service
            .submit(fixture.manager.state(), &fixture.animal)
            .await
            .is_ok()
    );
}

// =============================================================================
// Failure Mode Tests
// =============================================================================

#[tokio::test]
async fn test_cancel_without_request_fails() {
    let fixture = fixture().await;
    let service = service(&fixture);

    let err = service
        .cancel(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap_err();
    assert!(matches!(err, PawhavenError::NoSuchRequest { .. }));
}

#[tokio::test]
async fn test_duplicate_submit_never_creates_second_row() {
    let fixture = fixture().await;
    let service = service(&fixture);

    service
        .submit(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap();
    let err = service
        .submit(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap_err();
    assert!(matches!(err, PawhavenError::DuplicateRequest { .. }));

    // One cancel empties the pair completely: there was only ever one row.
    service
        .cancel(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap();
    assert!(!service.exists("a@b.com", fixture.animal.id).await.unwrap());
}

#[tokio::test]
async fn test_operations_require_active_session() {
    let fixture = fixture().await;
    let service = service(&fixture);
    let no_session = pawhaven_core::SessionState::NoSession;

    let err = service.submit(&no_session, &fixture.animal).await.unwrap_err();
    assert!(matches!(err, PawhavenError::NoActiveSession));

    let err = service.cancel(&no_session, &fixture.animal).await.unwrap_err();
    assert!(matches!(err, PawhavenError::NoActiveSession));
}

#[tokio::test]
async fn test_render_failure_leaves_row_for_reconciliation() {
    let fixture = fixture().await;
    let failing = AdoptionRequestService::new(
        &fixture.store,
        Arc::new(FailingGenerator),
        fixture.docs.path(),
    );

    let err = failing
        .submit(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap_err();
    assert!(matches!(err, PawhavenError::Render { .. }));

    // Documented inconsistency window: the row exists, the document does not.
    assert!(failing.exists("a@b.com", fixture.animal.id).await.unwrap());
    let missing = failing.audit().await.unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].animal_id, fixture.animal.id);

    // Cancel removes the row even though there is no file to delete.
    failing
        .cancel(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap();
    assert!(!failing.exists("a@b.com", fixture.animal.id).await.unwrap());
    assert!(failing.audit().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_audit_clean_after_successful_submit() {
    let fixture = fixture().await;
    let service = service(&fixture);

    service
        .submit(fixture.manager.state(), &fixture.animal)
        .await
        .unwrap();
    assert!(service.audit().await.unwrap().is_empty());
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[tokio::test]
async fn test_catalog_round_trip_and_code_uniqueness() {
    let fixture = fixture().await;
    let catalog = Catalog::new(&fixture.store);

    let found = catalog.find(fixture.animal.id).await.unwrap().unwrap();
    assert_eq!(found.code, "DOG-007");
    assert_eq!(found.gender, Gender::Male);
    assert_eq!(found.size, SizeCategory::Medium);

    let err = catalog
        .insert(NewAnimal {
            code: "DOG-007".to_string(),
            species: "Dog".to_string(),
            breed: "Terrier".to_string(),
            age: 1,
            gender: Gender::Female,
            size: SizeCategory::Small,
            description: "Second of the same code".to_string(),
            image_path: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PawhavenError::DuplicateAnimalCode { .. }));

    catalog.delete(fixture.animal.id).await.unwrap();
    assert!(catalog.find(fixture.animal.id).await.unwrap().is_none());
}
