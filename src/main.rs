use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use civic_registry_lib::auth::{Authenticator, DirectoryAuthenticator, LoginOutcome};
use civic_registry_lib::config::PortalConfig;
use civic_registry_lib::models::{DocumentStatus, RequestStatus};
use civic_registry_lib::presenter::Presenter;
use civic_registry_lib::services::RegistryService;

struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn success(&mut self, message: &str) {
        println!("[OK] {message}");
    }

    fn rejection(&mut self, message: &str) {
        println!("[REJECTED] {message}");
    }

    fn listing(&mut self, title: &str, lines: &[String]) {
        println!("── {title} ──");
        if lines.is_empty() {
            println!("(none)");
        }
        for line in lines {
            println!("{line}");
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize logging: {error}"))?;

    let config = PortalConfig::from_env();
    let mut service = RegistryService::open(&config.data_file)
        .with_context(|| format!("open record store at {}", config.data_file.display()))?;
    let mut presenter = ConsolePresenter;

    println!("Government Agency Portal");
    println!("Sign in as 'admin' or with a registered citizen email.");

    loop {
        let Some(identifier) = prompt("\nEmail (blank to exit)")? else {
            break;
        };
        if identifier.is_empty() {
            break;
        }
        let Some(secret) = prompt("Password")? else {
            break;
        };

        let outcome = {
            let authenticator = DirectoryAuthenticator::new(
                service.working_set(),
                &config.admin_identifier,
                &config.admin_secret,
            );
            authenticator.authenticate(&identifier, &secret)
        };

        match outcome {
            LoginOutcome::Admin => {
                presenter.success("Admin login successful");
                admin_session(&mut service, &mut presenter)?;
            }
            LoginOutcome::Citizen(citizen) => {
                presenter.success(&format!("Welcome, {}", citizen.name));
                citizen_session(&mut service, &mut presenter, &citizen.id)?;
            }
            LoginOutcome::NotFound => {
                presenter.rejection("Invalid credentials");
            }
        }
    }

    Ok(())
}

fn admin_session(service: &mut RegistryService, presenter: &mut ConsolePresenter) -> Result<()> {
    loop {
        println!();
        println!("[1] Register citizen    [6] Upload document        [10] File service request");
        println!("[2] Edit citizen        [7] Set document status    [11] Set request status");
        println!("[3] Delete citizen      [8] Update latest document [12] Update latest request");
        println!("[4] Find citizen        [9] List documents         [13] List service requests");
        println!("[5] List citizens       [0] Log out");
        let Some(choice) = prompt("Choice")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let Some(name) = prompt("Name")? else { return Ok(()) };
                let Some(email) = prompt("Email")? else { return Ok(()) };
                let Some(number) = prompt("Mobile number")? else { return Ok(()) };
                match service.add_citizen(&name, &email, &number) {
                    Ok(citizen) => {
                        presenter.success(&format!("Citizen added: {}", citizen.summary()))
                    }
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "2" => {
                let Some(id) = prompt("Citizen ID")? else { return Ok(()) };
                let Some(name) = prompt("New name")? else { return Ok(()) };
                let Some(email) = prompt("New email")? else { return Ok(()) };
                let Some(number) = prompt("New mobile number")? else { return Ok(()) };
                match service.edit_citizen(&id, &name, &email, &number) {
                    Ok(citizen) => {
                        presenter.success(&format!("Citizen updated: {}", citizen.summary()))
                    }
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "3" => {
                let Some(id) = prompt("Citizen ID")? else { return Ok(()) };
                match service.delete_citizen(&id) {
                    Ok(citizen) => {
                        presenter.success(&format!("Citizen {} deleted", citizen.id))
                    }
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "4" => {
                let Some(id) = prompt("Citizen ID")? else { return Ok(()) };
                match service.find_citizen(&id) {
                    Some(citizen) => presenter.listing("Citizen", &[citizen.summary()]),
                    None => presenter.rejection("Citizen not found"),
                }
            }
            "5" => {
                let lines: Vec<String> = service
                    .list_citizens()
                    .iter()
                    .map(|citizen| citizen.summary())
                    .collect();
                presenter.listing("All citizens", &lines);
            }
            "6" => {
                let Some(id) = prompt("Citizen ID")? else { return Ok(()) };
                match service.upload_document(&id) {
                    Ok(document) => {
                        presenter.success(&format!("Document uploaded: {}", document.summary()))
                    }
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "7" => {
                let Some(id) = prompt("Document ID")? else { return Ok(()) };
                let Some(status) = prompt_document_status(presenter)? else {
                    continue;
                };
                match service.set_document_status(&id, status) {
                    Ok(document) => presenter.success(&format!(
                        "Document {} set to {}",
                        document.id,
                        document.status.as_str()
                    )),
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "8" => {
                let Some(id) = prompt("Citizen ID")? else { return Ok(()) };
                let Some(status) = prompt_document_status(presenter)? else {
                    continue;
                };
                match service.update_latest_document_status(&id, status) {
                    Ok(document) => presenter.success(&format!(
                        "Document {} set to {}",
                        document.id,
                        document.status.as_str()
                    )),
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "9" => {
                let Some(id) = prompt("Citizen ID (blank for all)")? else {
                    return Ok(());
                };
                let lines: Vec<String> = if id.is_empty() {
                    service
                        .list_documents()
                        .iter()
                        .map(|document| document.summary())
                        .collect()
                } else {
                    service
                        .documents_for_citizen(&id)
                        .iter()
                        .map(|document| document.summary())
                        .collect()
                };
                presenter.listing("Documents", &lines);
            }
            "10" => {
                let Some(id) = prompt("Citizen ID")? else { return Ok(()) };
                let Some(service_type) = prompt("Service type")? else { return Ok(()) };
                let Some(description) = prompt("Description")? else { return Ok(()) };
                match service.submit_request(&id, &service_type, &description) {
                    Ok(request) => {
                        presenter.success(&format!("Request submitted: {}", request.summary()))
                    }
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "11" => {
                let Some(id) = prompt("Request ID")? else { return Ok(()) };
                let Some(status) = prompt_request_status(presenter)? else {
                    continue;
                };
                match service.set_request_status(&id, status) {
                    Ok(request) => presenter.success(&format!(
                        "Request {} set to {}",
                        request.id,
                        request.status.as_str()
                    )),
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "12" => {
                let Some(id) = prompt("Citizen ID")? else { return Ok(()) };
                let Some(status) = prompt_request_status(presenter)? else {
                    continue;
                };
                match service.update_latest_request_status(&id, status) {
                    Ok(request) => presenter.success(&format!(
                        "Request {} set to {}",
                        request.id,
                        request.status.as_str()
                    )),
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "13" => {
                let Some(id) = prompt("Citizen ID (blank for all)")? else {
                    return Ok(());
                };
                let lines: Vec<String> = if id.is_empty() {
                    service
                        .list_requests()
                        .iter()
                        .map(|request| request.summary())
                        .collect()
                } else {
                    service
                        .requests_for_citizen(&id)
                        .iter()
                        .map(|request| request.summary())
                        .collect()
                };
                presenter.listing("Service requests", &lines);
            }
            "0" => return Ok(()),
            _ => presenter.rejection("Unknown choice"),
        }
    }
}

fn citizen_session(
    service: &mut RegistryService,
    presenter: &mut ConsolePresenter,
    citizen_id: &str,
) -> Result<()> {
    loop {
        println!();
        println!("[1] My profile   [3] My documents   [5] Submit service request");
        println!("[2] Update contact details           [4] My requests   [0] Log out");
        let Some(choice) = prompt("Choice")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => match service.find_citizen(citizen_id) {
                Some(citizen) => presenter.listing("My profile", &[citizen.summary()]),
                None => {
                    presenter.rejection("Your record is no longer on file");
                    return Ok(());
                }
            },
            "2" => {
                let Some(email) = prompt("New email")? else { return Ok(()) };
                let Some(number) = prompt("New mobile number")? else { return Ok(()) };
                match service.update_contact(citizen_id, &email, &number) {
                    Ok(citizen) => {
                        presenter.success(&format!("Profile updated: {}", citizen.summary()))
                    }
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "3" => {
                let lines: Vec<String> = service
                    .documents_for_citizen(citizen_id)
                    .iter()
                    .map(|document| document.summary())
                    .collect();
                presenter.listing("My documents", &lines);
            }
            "4" => {
                let lines: Vec<String> = service
                    .requests_for_citizen(citizen_id)
                    .iter()
                    .map(|request| request.summary())
                    .collect();
                presenter.listing("My service requests", &lines);
            }
            "5" => {
                let Some(service_type) = prompt("Service type")? else { return Ok(()) };
                let Some(description) = prompt("Description")? else { return Ok(()) };
                match service.submit_request(citizen_id, &service_type, &description) {
                    Ok(request) => {
                        presenter.success(&format!("Request submitted: {}", request.summary()))
                    }
                    Err(error) => presenter.rejection(&error.to_string()),
                }
            }
            "0" => return Ok(()),
            _ => presenter.rejection("Unknown choice"),
        }
    }
}

fn prompt_document_status(presenter: &mut ConsolePresenter) -> Result<Option<DocumentStatus>> {
    let Some(raw) = prompt("Status (PENDING/APPROVED/REJECTED)")? else {
        return Ok(None);
    };
    match DocumentStatus::parse(&raw) {
        Some(status) => Ok(Some(status)),
        None => {
            presenter.rejection("Unknown document status");
            Ok(None)
        }
    }
}

fn prompt_request_status(presenter: &mut ConsolePresenter) -> Result<Option<RequestStatus>> {
    let Some(raw) = prompt("Status (REQUESTED/PROCESSING/COMPLETED/REJECTED)")? else {
        return Ok(None);
    };
    match RequestStatus::parse(&raw) {
        Some(status) => Ok(Some(status)),
        None => {
            presenter.rejection("Unknown request status");
            Ok(None)
        }
    }
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line).context("read stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
