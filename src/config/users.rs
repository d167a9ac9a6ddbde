//! Demo-credential user list loaded from config.toml.
//!
//! The login gate is intentionally non-cryptographic: a fixed list of demo
//! users with plain-text passwords, checked in process. The list is loaded
//! from a TOML file so deployments can swap credentials without a rebuild.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of demo users allowed to log in
    pub users: Vec<DemoUser>,
}

/// One demo credential entry
#[derive(Debug, Deserialize, Clone)]
pub struct DemoUser {
    /// Login name checked at the gate
    pub login: String,
    /// Plain-text demo password (not real authentication, by design)
    pub password: String,
    /// Full display name carried into the session
    pub full_name: String,
    /// Role label carried into the session
    pub role: String,
}

/// Loads the demo-user configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the demo-user configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_users_config() {
        let toml_str = r#"
            [[users]]
            login = "davetisyan"
            password = "demo"
            full_name = "D. Avetisyan"
            role = "administrator"

            [[users]]
            login = "accountant1"
            password = "demo"
            full_name = "Test Accountant"
            role = "accountant"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].login, "davetisyan");
        assert_eq!(config.users[0].role, "administrator");
        assert_eq!(config.users[1].full_name, "Test Accountant");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let toml_str = r#"
            [[users]]
            login = "nopassword"
        "#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
