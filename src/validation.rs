use once_cell::sync::Lazy;
use regex::Regex;

static CITIZEN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z. ]+$").expect("valid regex"));
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]{2,}$").expect("valid regex")
});
static CITIZEN_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
static PH_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(09|\+639|\+6309)[0-9]{9}$").expect("valid regex"));

pub fn is_valid_citizen_name(name: &str) -> bool {
    CITIZEN_NAME.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_valid_citizen_id(id: &str) -> bool {
    CITIZEN_ID.is_match(id)
}

pub fn is_valid_ph_mobile(number: &str) -> bool {
    let normalized = number.trim();
    !normalized.is_empty() && PH_MOBILE.is_match(normalized)
}
