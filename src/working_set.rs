use std::collections::HashMap;

use chrono::Utc;

use crate::errors::{AppError, AppResult};
use crate::models::{Citizen, Document, ServiceRequest};
use crate::store::RecordStore;

pub fn generate_document_id(citizen_id: &str) -> String {
    format!("DOC-{}-{}", citizen_id, Utc::now().format("%m%d%y-%H%M-%S"))
}

pub fn generate_request_id(citizen_id: &str) -> String {
    format!("REQ-{}-{}", citizen_id, Utc::now().format("%m%d%y-%H%M-%S"))
}

#[derive(Debug, Default)]
pub struct WorkingSet {
    citizens: HashMap<String, Citizen>,
    documents: Vec<Document>,
    requests: Vec<ServiceRequest>,
    next_citizen_id: u64,
}

impl WorkingSet {
    pub fn build(store: &RecordStore) -> AppResult<Self> {
        let mut citizens = HashMap::new();
        let mut next_citizen_id: u64 = 1;
        for row in store.citizen_rows() {
            let numeric: u64 = row.id.parse().map_err(|_| {
                AppError::State(format!("citizen id '{}' is not numeric", row.id))
            })?;
            if numeric >= next_citizen_id {
                next_citizen_id = numeric + 1;
            }
            citizens.insert(row.id.clone(), row.clone());
        }

        let documents = store
            .document_rows()
            .iter()
            .map(|row| Document {
                id: row.id.clone(),
                citizen_id: row.owner_id.clone(),
                status: row.status,
                upload_time: Utc::now(),
            })
            .collect();

        let requests = store
            .request_rows()
            .iter()
            .map(|row| ServiceRequest {
                id: row.id.clone(),
                citizen_id: row.citizen_id.clone(),
                service_type: row.service_type.clone(),
                description: row.description.clone(),
                status: row.status,
                submitted_at: row.date.unwrap_or_else(Utc::now),
            })
            .collect();

        Ok(Self {
            citizens,
            documents,
            requests,
            next_citizen_id,
        })
    }

    pub fn next_citizen_id(&self) -> u64 {
        self.next_citizen_id
    }

    pub fn allocate_citizen_id(&mut self) -> String {
        let id = self.next_citizen_id.to_string();
        self.next_citizen_id += 1;
        id
    }

    pub fn citizen(&self, citizen_id: &str) -> Option<&Citizen> {
        self.citizens.get(citizen_id)
    }

    pub fn contains_citizen(&self, citizen_id: &str) -> bool {
        self.citizens.contains_key(citizen_id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Citizen> {
        let needle = email.trim().to_lowercase();
        self.citizens
            .values()
            .find(|citizen| citizen.email.trim().to_lowercase() == needle)
    }

    pub fn email_in_use(&self, email: &str, excluding_id: Option<&str>) -> bool {
        self.citizens.values().any(|citizen| {
            excluding_id != Some(citizen.id.as_str())
                && citizen.email.eq_ignore_ascii_case(email)
        })
    }

    pub fn insert_citizen(&mut self, citizen: Citizen) {
        self.citizens.insert(citizen.id.clone(), citizen);
    }

    pub fn remove_citizen(&mut self, citizen_id: &str) -> Option<Citizen> {
        self.citizens.remove(citizen_id)
    }

    pub fn citizens_sorted(&self) -> Vec<&Citizen> {
        let mut all: Vec<&Citizen> = self.citizens.values().collect();
        all.sort_by_key(|citizen| citizen.id.parse::<u64>().unwrap_or(u64::MAX));
        all
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_for(&self, citizen_id: &str) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|document| document.citizen_id == citizen_id)
            .collect()
    }

    pub fn push_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn document_mut(&mut self, document_id: &str) -> Option<&mut Document> {
        self.documents
            .iter_mut()
            .find(|document| document.id == document_id)
    }

    pub fn last_document_mut_for(&mut self, citizen_id: &str) -> Option<&mut Document> {
        self.documents
            .iter_mut()
            .rev()
            .find(|document| document.citizen_id == citizen_id)
    }

    pub fn requests(&self) -> &[ServiceRequest] {
        &self.requests
    }

    pub fn requests_for(&self, citizen_id: &str) -> Vec<&ServiceRequest> {
        self.requests
            .iter()
            .filter(|request| request.citizen_id == citizen_id)
            .collect()
    }

    pub fn push_request(&mut self, request: ServiceRequest) {
        self.requests.push(request);
    }

    pub fn request_mut(&mut self, request_id: &str) -> Option<&mut ServiceRequest> {
        self.requests
            .iter_mut()
            .find(|request| request.id == request_id)
    }

    pub fn last_request_mut_for(&mut self, citizen_id: &str) -> Option<&mut ServiceRequest> {
        self.requests
            .iter_mut()
            .rev()
            .find(|request| request.citizen_id == citizen_id)
    }

    pub fn has_open_request(&self, citizen_id: &str, service_type: &str) -> bool {
        self.requests.iter().any(|request| {
            request.citizen_id == citizen_id
                && !request.status.is_terminal()
                && request.service_type.eq_ignore_ascii_case(service_type)
        })
    }
}
