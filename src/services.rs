use std::path::PathBuf;

use chrono::Utc;
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::models::{Citizen, Document, DocumentStatus, RequestStatus, ServiceRequest};
use crate::store::{DocumentRow, RecordStore, RequestRow};
use crate::validation;
use crate::working_set::{self, WorkingSet};

pub struct RegistryService {
    store: RecordStore,
    working_set: WorkingSet,
}

impl RegistryService {
    pub fn new(store: RecordStore, working_set: WorkingSet) -> Self {
        Self { store, working_set }
    }

    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let store = RecordStore::open(path)?;
        let working_set = WorkingSet::build(&store)?;
        Ok(Self::new(store, working_set))
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // Saves are best-effort: a failed write leaves the working set as the
    // source of truth and the file stale until the next successful save.
    fn persist(&mut self, action: &str, op: impl FnOnce(&mut RecordStore) -> AppResult<()>) {
        if let Err(error) = op(&mut self.store) {
            warn!(action, error = %error, "record store save failed; keeping in-memory state");
        }
    }

    // ─── Citizens ────────────────────────────────────────────────────────────

    pub fn add_citizen(&mut self, name: &str, email: &str, number: &str) -> AppResult<Citizen> {
        let name = name.trim();
        let email = email.trim();
        let number = number.trim();

        if !validation::is_valid_citizen_name(name) {
            return Err(AppError::Validation(
                "Invalid name. Only letters, periods, and spaces are allowed".to_string(),
            ));
        }
        if !validation::is_valid_email(email) {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }
        if !validation::is_valid_ph_mobile(number) {
            return Err(AppError::Validation(
                "Invalid Philippine mobile number".to_string(),
            ));
        }

        let candidate_id = self.working_set.next_citizen_id().to_string();
        if self.working_set.contains_citizen(&candidate_id) {
            return Err(AppError::Conflict(format!(
                "Citizen ID '{}' already exists",
                candidate_id
            )));
        }
        if self.working_set.email_in_use(email, None) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already in use",
                email
            )));
        }

        let citizen = Citizen {
            id: self.working_set.allocate_citizen_id(),
            name: name.to_string(),
            email: email.to_string(),
            number: number.to_string(),
        };
        self.working_set.insert_citizen(citizen.clone());
        self.persist("add citizen", |store| store.add_citizen(&citizen));
        Ok(citizen)
    }

    pub fn edit_citizen(
        &mut self,
        citizen_id: &str,
        name: &str,
        email: &str,
        number: &str,
    ) -> AppResult<Citizen> {
        let citizen_id = citizen_id.trim();
        let name = name.trim();
        let email = email.trim();
        let number = number.trim();

        if !self.working_set.contains_citizen(citizen_id) {
            return Err(AppError::NotFound(format!(
                "Citizen ID '{}' not found",
                citizen_id
            )));
        }
        if name.is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }
        if !validation::is_valid_email(email) {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }
        if self.working_set.email_in_use(email, Some(citizen_id)) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already in use by another citizen",
                email
            )));
        }
        if !validation::is_valid_citizen_name(name) {
            return Err(AppError::Validation(
                "Invalid name. Only letters, periods, and spaces are allowed".to_string(),
            ));
        }
        if !validation::is_valid_ph_mobile(number) {
            return Err(AppError::Validation(
                "Invalid Philippine mobile number".to_string(),
            ));
        }

        let updated = Citizen {
            id: citizen_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            number: number.to_string(),
        };
        self.working_set.insert_citizen(updated.clone());
        self.persist("edit citizen", |store| {
            store.update_citizen(&updated.id, &updated)
        });
        Ok(updated)
    }

    pub fn update_contact(
        &mut self,
        citizen_id: &str,
        email: &str,
        number: &str,
    ) -> AppResult<Citizen> {
        let citizen_id = citizen_id.trim();
        let email = email.trim();
        let number = number.trim();

        let current = match self.working_set.citizen(citizen_id) {
            Some(citizen) => citizen.clone(),
            None => {
                return Err(AppError::NotFound(format!(
                    "Citizen ID '{}' not found",
                    citizen_id
                )))
            }
        };
        if email.is_empty() || number.is_empty() {
            return Err(AppError::Validation(
                "Email and phone cannot be empty".to_string(),
            ));
        }
        if !validation::is_valid_email(email) {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }
        if self.working_set.email_in_use(email, Some(citizen_id)) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already in use by another citizen",
                email
            )));
        }
        if !validation::is_valid_ph_mobile(number) {
            return Err(AppError::Validation(
                "Invalid Philippine mobile number".to_string(),
            ));
        }

        let updated = Citizen {
            id: current.id,
            name: current.name,
            email: email.to_string(),
            number: number.to_string(),
        };
        self.working_set.insert_citizen(updated.clone());
        self.persist("update contact", |store| {
            store.update_citizen(&updated.id, &updated)
        });
        Ok(updated)
    }

    pub fn delete_citizen(&mut self, citizen_id: &str) -> AppResult<Citizen> {
        let citizen_id = citizen_id.trim();
        let removed = match self.working_set.remove_citizen(citizen_id) {
            Some(citizen) => citizen,
            None => {
                return Err(AppError::NotFound(format!(
                    "Citizen ID '{}' not found",
                    citizen_id
                )))
            }
        };
        self.persist("delete citizen", |store| store.delete_citizen(&removed.id));
        Ok(removed)
    }

    pub fn find_citizen(&self, citizen_id: &str) -> Option<&Citizen> {
        self.working_set.citizen(citizen_id.trim())
    }

    pub fn list_citizens(&self) -> Vec<&Citizen> {
        self.working_set.citizens_sorted()
    }

    // ─── Documents ───────────────────────────────────────────────────────────

    pub fn upload_document(&mut self, citizen_id: &str) -> AppResult<Document> {
        let citizen_id = citizen_id.trim();
        if citizen_id.is_empty() {
            return Err(AppError::Validation(
                "Citizen ID cannot be empty".to_string(),
            ));
        }
        if !self.working_set.contains_citizen(citizen_id) {
            return Err(AppError::NotFound(format!(
                "Citizen ID '{}' does not exist",
                citizen_id
            )));
        }

        let document = Document {
            id: working_set::generate_document_id(citizen_id),
            citizen_id: citizen_id.to_string(),
            status: DocumentStatus::Pending,
            upload_time: Utc::now(),
        };
        self.working_set.push_document(document.clone());
        let row = DocumentRow {
            id: document.id.clone(),
            owner_id: document.citizen_id.clone(),
            status: document.status,
        };
        self.persist("upload document", |store| store.add_document(&row));
        Ok(document)
    }

    pub fn set_document_status(
        &mut self,
        document_id: &str,
        status: DocumentStatus,
    ) -> AppResult<Document> {
        let document_id = document_id.trim();
        let snapshot = match self.working_set.document_mut(document_id) {
            Some(document) => {
                document.status = status;
                document.clone()
            }
            None => {
                return Err(AppError::NotFound(format!(
                    "Document '{}' not found",
                    document_id
                )))
            }
        };
        let row = DocumentRow {
            id: snapshot.id.clone(),
            owner_id: snapshot.citizen_id.clone(),
            status: snapshot.status,
        };
        self.persist("set document status", |store| {
            store.update_document(&row.id, &row)
        });
        Ok(snapshot)
    }

    // Legacy selection policy: the citizen's most recently appended document
    // is the one updated, not most recent by timestamp.
    pub fn update_latest_document_status(
        &mut self,
        citizen_id: &str,
        status: DocumentStatus,
    ) -> AppResult<Document> {
        let citizen_id = citizen_id.trim();
        if citizen_id.is_empty() {
            return Err(AppError::Validation(
                "Citizen ID cannot be empty".to_string(),
            ));
        }
        if !self.working_set.contains_citizen(citizen_id) {
            return Err(AppError::NotFound(format!(
                "Citizen ID '{}' does not exist",
                citizen_id
            )));
        }
        let snapshot = match self.working_set.last_document_mut_for(citizen_id) {
            Some(document) => {
                document.status = status;
                document.clone()
            }
            None => {
                return Err(AppError::NotFound(format!(
                    "No documents found for citizen ID '{}'",
                    citizen_id
                )))
            }
        };
        let row = DocumentRow {
            id: snapshot.id.clone(),
            owner_id: snapshot.citizen_id.clone(),
            status: snapshot.status,
        };
        self.persist("update latest document status", |store| {
            store.update_document(&row.id, &row)
        });
        Ok(snapshot)
    }

    pub fn documents_for_citizen(&self, citizen_id: &str) -> Vec<&Document> {
        self.working_set.documents_for(citizen_id.trim())
    }

    pub fn list_documents(&self) -> &[Document] {
        self.working_set.documents()
    }

    // ─── Service Requests ────────────────────────────────────────────────────

    pub fn submit_request(
        &mut self,
        citizen_id: &str,
        service_type: &str,
        description: &str,
    ) -> AppResult<ServiceRequest> {
        let citizen_id = citizen_id.trim();
        let service_type = service_type.trim();
        let description = description.trim();

        if citizen_id.is_empty() {
            return Err(AppError::Validation(
                "Citizen ID cannot be empty".to_string(),
            ));
        }
        if !self.working_set.contains_citizen(citizen_id) {
            return Err(AppError::NotFound(format!(
                "Citizen ID '{}' does not exist",
                citizen_id
            )));
        }
        if service_type.is_empty() {
            return Err(AppError::Validation(
                "Service type cannot be empty".to_string(),
            ));
        }
        if description.is_empty() {
            return Err(AppError::Validation(
                "Description cannot be empty".to_string(),
            ));
        }
        if self.working_set.has_open_request(citizen_id, service_type) {
            return Err(AppError::Conflict(format!(
                "Citizen '{}' already has an open '{}' request",
                citizen_id, service_type
            )));
        }

        let request = ServiceRequest {
            id: working_set::generate_request_id(citizen_id),
            citizen_id: citizen_id.to_string(),
            service_type: service_type.to_string(),
            description: description.to_string(),
            status: RequestStatus::Requested,
            submitted_at: Utc::now(),
        };
        self.working_set.push_request(request.clone());
        let row = RequestRow {
            id: request.id.clone(),
            citizen_id: request.citizen_id.clone(),
            service_type: request.service_type.clone(),
            description: request.description.clone(),
            status: request.status,
            date: Some(request.submitted_at),
        };
        self.persist("submit request", |store| store.add_request(&row));
        Ok(request)
    }

    pub fn set_request_status(
        &mut self,
        request_id: &str,
        status: RequestStatus,
    ) -> AppResult<ServiceRequest> {
        let request_id = request_id.trim();
        let snapshot = match self.working_set.request_mut(request_id) {
            Some(request) => {
                request.status = status;
                request.clone()
            }
            None => {
                return Err(AppError::NotFound(format!(
                    "Request '{}' not found",
                    request_id
                )))
            }
        };
        let row = request_row(&snapshot);
        self.persist("set request status", |store| {
            store.update_request(&row.id, &row)
        });
        Ok(snapshot)
    }

    // Legacy variant keyed by citizen id. Does not require the citizen to
    // still exist, only that at least one request carries the id.
    pub fn update_latest_request_status(
        &mut self,
        citizen_id: &str,
        status: RequestStatus,
    ) -> AppResult<ServiceRequest> {
        let citizen_id = citizen_id.trim();
        if citizen_id.is_empty() {
            return Err(AppError::Validation(
                "Citizen ID cannot be empty".to_string(),
            ));
        }
        let snapshot = match self.working_set.last_request_mut_for(citizen_id) {
            Some(request) => {
                request.status = status;
                request.clone()
            }
            None => {
                return Err(AppError::NotFound(format!(
                    "No service requests found for citizen ID '{}'",
                    citizen_id
                )))
            }
        };
        let row = request_row(&snapshot);
        self.persist("update latest request status", |store| {
            store.update_request(&row.id, &row)
        });
        Ok(snapshot)
    }

    pub fn requests_for_citizen(&self, citizen_id: &str) -> Vec<&ServiceRequest> {
        self.working_set.requests_for(citizen_id.trim())
    }

    pub fn list_requests(&self) -> &[ServiceRequest] {
        self.working_set.requests()
    }
}

fn request_row(request: &ServiceRequest) -> RequestRow {
    RequestRow {
        id: request.id.clone(),
        citizen_id: request.citizen_id.clone(),
        service_type: request.service_type.clone(),
        description: request.description.clone(),
        status: request.status,
        date: Some(request.submitted_at),
    }
}
