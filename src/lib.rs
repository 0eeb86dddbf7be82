pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod presenter;
pub mod services;
pub mod store;
pub mod validation;
pub mod working_set;

pub use auth::{Authenticator, DirectoryAuthenticator, LoginOutcome};
pub use config::PortalConfig;
pub use errors::{AppError, AppResult};
pub use models::{Citizen, Document, DocumentStatus, RequestStatus, ServiceRequest};
pub use presenter::Presenter;
pub use services::RegistryService;
pub use store::RecordStore;
pub use working_set::WorkingSet;
