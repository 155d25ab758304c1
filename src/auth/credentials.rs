//! Credential storage
//!
//! The configured default user/password pair.

use crate::config::AuthConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl From<&AuthConfig> for Credentials {
    fn from(config: &AuthConfig) -> Self {
        Credentials::new(&config.default_username, &config.default_password)
    }
}
