use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::{Citizen, DocumentStatus, RequestStatus};

pub const DEFAULT_STORE_FILE: &str = "database.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub id: String,
    pub owner_id: String,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestRow {
    pub id: String,
    pub citizen_id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub description: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreDocument {
    #[serde(default)]
    pub citizens: Vec<Citizen>,
    #[serde(default)]
    pub documents: Vec<DocumentRow>,
    #[serde(default)]
    pub requests: Vec<RequestRow>,
}

#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    document: StoreDocument,
}

impl RecordStore {
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| AppError::Io(error.to_string()))?;
            }
        }

        let document = if path.exists() {
            match read_document(&path) {
                Ok(document) => document,
                Err(error) => {
                    tracing::warn!(
                        path = %path.to_string_lossy(),
                        error = %error,
                        "record store unreadable; resetting to an empty document"
                    );
                    StoreDocument::default()
                }
            }
        } else {
            StoreDocument::default()
        };

        let store = Self { path, document };
        store.save()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn citizen_rows(&self) -> &[Citizen] {
        &self.document.citizens
    }

    pub fn document_rows(&self) -> &[DocumentRow] {
        &self.document.documents
    }

    pub fn request_rows(&self) -> &[RequestRow] {
        &self.document.requests
    }

    pub fn add_citizen(&mut self, citizen: &Citizen) -> AppResult<()> {
        self.document.citizens.push(citizen.clone());
        self.save()
    }

    pub fn update_citizen(&mut self, citizen_id: &str, citizen: &Citizen) -> AppResult<()> {
        if let Some(row) = self
            .document
            .citizens
            .iter_mut()
            .find(|row| row.id == citizen_id)
        {
            row.name = citizen.name.clone();
            row.email = citizen.email.clone();
            row.number = citizen.number.clone();
        }
        self.save()
    }

    pub fn delete_citizen(&mut self, citizen_id: &str) -> AppResult<()> {
        self.document.citizens.retain(|row| row.id != citizen_id);
        self.save()
    }

    pub fn add_document(&mut self, row: &DocumentRow) -> AppResult<()> {
        self.document.documents.push(row.clone());
        self.save()
    }

    pub fn update_document(&mut self, document_id: &str, row: &DocumentRow) -> AppResult<()> {
        if let Some(existing) = self
            .document
            .documents
            .iter_mut()
            .find(|existing| existing.id == document_id)
        {
            existing.status = row.status;
        }
        self.save()
    }

    pub fn delete_document(&mut self, document_id: &str) -> AppResult<()> {
        self.document.documents.retain(|row| row.id != document_id);
        self.save()
    }

    pub fn add_request(&mut self, row: &RequestRow) -> AppResult<()> {
        self.document.requests.push(row.clone());
        self.save()
    }

    pub fn update_request(&mut self, request_id: &str, row: &RequestRow) -> AppResult<()> {
        if let Some(existing) = self
            .document
            .requests
            .iter_mut()
            .find(|existing| existing.id == request_id)
        {
            existing.status = row.status;
        }
        self.save()
    }

    pub fn delete_request(&mut self, request_id: &str) -> AppResult<()> {
        self.document.requests.retain(|row| row.id != request_id);
        self.save()
    }

    fn save(&self) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.document)?;
        fs::write(&self.path, bytes).map_err(|error| AppError::Io(error.to_string()))?;
        Ok(())
    }
}

fn read_document(path: &Path) -> AppResult<StoreDocument> {
    let bytes = fs::read(path).map_err(|error| AppError::Io(error.to_string()))?;
    serde_json::from_slice(&bytes).map_err(AppError::from)
}
