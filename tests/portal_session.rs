use std::fs;

use tempfile::TempDir;

use civic_registry_lib::auth::{Authenticator, DirectoryAuthenticator, LoginOutcome};
use civic_registry_lib::models::{DocumentStatus, RequestStatus};
use civic_registry_lib::presenter::Presenter;
use civic_registry_lib::services::RegistryService;

#[derive(Debug, Default)]
struct RecordingPresenter {
    successes: Vec<String>,
    rejections: Vec<String>,
    listings: Vec<(String, Vec<String>)>,
}

impl Presenter for RecordingPresenter {
    fn success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn rejection(&mut self, message: &str) {
        self.rejections.push(message.to_string());
    }

    fn listing(&mut self, title: &str, lines: &[String]) {
        self.listings.push((title.to_string(), lines.to_vec()));
    }
}

#[test]
fn fresh_session_creates_empty_three_collection_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let service = RegistryService::open(&path).unwrap();

    assert!(service.list_citizens().is_empty());
    assert!(service.list_documents().is_empty());
    assert!(service.list_requests().is_empty());

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["citizens"], serde_json::json!([]));
    assert_eq!(raw["documents"], serde_json::json!([]));
    assert_eq!(raw["requests"], serde_json::json!([]));
}

#[test]
fn session_backfills_missing_requests_collection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    fs::write(
        &path,
        r#"{
            "citizens": [
                {"id": "1", "name": "Juan Dela Cruz", "email": "juan@x.com", "number": "09171234567"}
            ],
            "documents": []
        }"#,
    )
    .unwrap();

    let service = RegistryService::open(&path).unwrap();
    assert_eq!(service.list_citizens().len(), 1);
    assert!(service.list_requests().is_empty());

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["requests"], serde_json::json!([]));
}

#[test]
fn round_trip_reproduces_equivalent_entities() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");

    let mut service = RegistryService::open(&path).unwrap();
    let juan = service
        .add_citizen("Juan Dela Cruz", "juan@x.com", "09171234567")
        .unwrap();
    let maria = service
        .add_citizen("Maria Clara", "maria@x.com", "+639181234567")
        .unwrap();
    let document = service.upload_document(&juan.id).unwrap();
    service
        .set_document_status(&document.id, DocumentStatus::Approved)
        .unwrap();
    let request = service
        .submit_request(&maria.id, "Barangay Clearance", "for employment")
        .unwrap();
    service
        .set_request_status(&request.id, RequestStatus::Processing)
        .unwrap();

    let reopened = RegistryService::open(&path).unwrap();

    let citizens: Vec<_> = reopened.list_citizens().into_iter().cloned().collect();
    assert_eq!(citizens, vec![juan.clone(), maria.clone()]);

    let documents = reopened.list_documents();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, document.id);
    assert_eq!(documents[0].citizen_id, juan.id);
    assert_eq!(documents[0].status, DocumentStatus::Approved);

    let requests = reopened.list_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, request.id);
    assert_eq!(requests[0].citizen_id, maria.id);
    assert_eq!(requests[0].service_type, "Barangay Clearance");
    assert_eq!(requests[0].description, "for employment");
    assert_eq!(requests[0].status, RequestStatus::Processing);
    assert_eq!(requests[0].submitted_at, request.submitted_at);
}

#[test]
fn first_citizen_gets_id_one_and_duplicate_email_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut service = RegistryService::open(dir.path().join("database.json")).unwrap();

    let juan = service
        .add_citizen("Juan Dela Cruz", "juan@x.com", "09171234567")
        .unwrap();
    assert_eq!(juan.id, "1");

    let error = service
        .add_citizen("Juana Cruz", "JUAN@x.com", "09181234567")
        .unwrap_err();
    assert!(error.to_string().contains("already in use"));
}

#[test]
fn upload_for_unknown_citizen_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let mut service = RegistryService::open(&path).unwrap();
    service
        .add_citizen("Juan Dela Cruz", "juan@x.com", "09171234567")
        .unwrap();

    let before = fs::read(&path).unwrap();
    let error = service.upload_document("999").unwrap_err();
    assert!(error.to_string().contains("999"));
    assert!(service.list_documents().is_empty());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn passport_request_reopens_after_completion() {
    let dir = TempDir::new().unwrap();
    let mut service = RegistryService::open(dir.path().join("database.json")).unwrap();
    service
        .add_citizen("Juan Dela Cruz", "juan@x.com", "09171234567")
        .unwrap();

    let passport = service
        .submit_request("1", "Passport", "first application")
        .unwrap();
    assert_eq!(passport.status, RequestStatus::Requested);

    let error = service
        .submit_request("1", "Passport", "second application")
        .unwrap_err();
    assert!(error.to_string().contains("Passport"));

    service
        .set_request_status(&passport.id, RequestStatus::Completed)
        .unwrap();
    let renewal = service
        .submit_request("1", "Passport", "renewal")
        .unwrap();
    assert_eq!(renewal.status, RequestStatus::Requested);
}

#[test]
fn request_date_is_written_once_and_never_updated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let mut service = RegistryService::open(&path).unwrap();
    service
        .add_citizen("Juan Dela Cruz", "juan@x.com", "09171234567")
        .unwrap();
    let request = service
        .submit_request("1", "Passport", "first application")
        .unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let created_date = raw["requests"][0]["date"].clone();
    assert!(created_date.is_string());

    service
        .set_request_status(&request.id, RequestStatus::Completed)
        .unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["requests"][0]["date"], created_date);
    assert_eq!(raw["requests"][0]["status"], "COMPLETED");
}

#[test]
fn login_resolves_admin_citizen_and_unknown() {
    let dir = TempDir::new().unwrap();
    let mut service = RegistryService::open(dir.path().join("database.json")).unwrap();
    service
        .add_citizen("Juan Dela Cruz", "juan@x.com", "09171234567")
        .unwrap();

    let authenticator = DirectoryAuthenticator::new(service.working_set(), "admin", "123");
    assert_eq!(authenticator.authenticate("Admin", "123"), LoginOutcome::Admin);

    match authenticator.authenticate("JUAN@X.COM", "09171234567") {
        LoginOutcome::Citizen(citizen) => assert_eq!(citizen.name, "Juan Dela Cruz"),
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(
        authenticator.authenticate("juan@x.com", "09999999999"),
        LoginOutcome::NotFound
    );
}

#[test]
fn outcomes_flow_to_the_presenter_as_plain_messages() {
    let dir = TempDir::new().unwrap();
    let mut service = RegistryService::open(dir.path().join("database.json")).unwrap();
    let mut presenter = RecordingPresenter::default();

    match service.add_citizen("Juan Dela Cruz", "juan@x.com", "09171234567") {
        Ok(citizen) => presenter.success(&format!("Citizen added: {}", citizen.summary())),
        Err(error) => presenter.rejection(&error.to_string()),
    }
    match service.add_citizen("Juan II", "juan@x.com", "09181234567") {
        Ok(citizen) => presenter.success(&format!("Citizen added: {}", citizen.summary())),
        Err(error) => presenter.rejection(&error.to_string()),
    }
    let lines: Vec<String> = service
        .list_citizens()
        .iter()
        .map(|citizen| citizen.summary())
        .collect();
    presenter.listing("All citizens", &lines);

    assert_eq!(presenter.successes.len(), 1);
    assert!(presenter.successes[0].contains("juan@x.com"));
    assert_eq!(presenter.rejections.len(), 1);
    assert!(presenter.rejections[0].starts_with("CONFLICT:"));
    assert_eq!(presenter.listings.len(), 1);
    assert_eq!(presenter.listings[0].1.len(), 1);
}
