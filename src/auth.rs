use crate::models::Citizen;
use crate::working_set::WorkingSet;

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Admin,
    Citizen(Citizen),
    NotFound,
}

pub trait Authenticator {
    fn authenticate(&self, identifier: &str, secret: &str) -> LoginOutcome;
}

pub struct DirectoryAuthenticator<'a> {
    working_set: &'a WorkingSet,
    admin_identifier: String,
    admin_secret: String,
}

impl<'a> DirectoryAuthenticator<'a> {
    pub fn new(
        working_set: &'a WorkingSet,
        admin_identifier: impl Into<String>,
        admin_secret: impl Into<String>,
    ) -> Self {
        Self {
            working_set,
            admin_identifier: admin_identifier.into(),
            admin_secret: admin_secret.into(),
        }
    }
}

impl Authenticator for DirectoryAuthenticator<'_> {
    fn authenticate(&self, identifier: &str, secret: &str) -> LoginOutcome {
        let identifier = identifier.trim();
        let secret = secret.trim();
        if identifier.is_empty() || secret.is_empty() {
            return LoginOutcome::NotFound;
        }

        if identifier.eq_ignore_ascii_case(&self.admin_identifier) {
            if secret == self.admin_secret {
                return LoginOutcome::Admin;
            }
            return LoginOutcome::NotFound;
        }

        match self.working_set.find_by_email(identifier) {
            Some(citizen) if citizen.number.trim() == secret => {
                LoginOutcome::Citizen(citizen.clone())
            }
            _ => LoginOutcome::NotFound,
        }
    }
}
