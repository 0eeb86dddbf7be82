use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::store::DEFAULT_STORE_FILE;

pub const DATA_FILE_ENV: &str = "CIVIC_DATA_FILE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalConfig {
    pub data_file: PathBuf,
    pub admin_identifier: String,
    pub admin_secret: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_STORE_FILE),
            admin_identifier: "admin".to_string(),
            admin_secret: "123".to_string(),
        }
    }
}

impl PortalConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(DATA_FILE_ENV) {
            if !path.trim().is_empty() {
                config.data_file = PathBuf::from(path);
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_portal_literals() {
        let config = PortalConfig::default();
        assert_eq!(config.data_file, PathBuf::from("database.json"));
        assert_eq!(config.admin_identifier, "admin");
        assert_eq!(config.admin_secret, "123");
    }
}
