//! Authentication validator
//!
//! Two fixed rules, checked in order: the anonymous user name logs in with
//! any password, then the configured default pair must match exactly.
//! Attempt limits and failure delays come from configuration and are off by
//! default.

use std::time::Duration;

use super::credentials::Credentials;
use super::results::LoginKind;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// User name that logs in with any password
pub const ANONYMOUS_USERNAME: &str = "anon";

#[derive(Debug, Clone)]
pub struct AuthPolicy {
    default_credentials: Credentials,
    max_attempts: Option<u32>,
    failure_delay: Duration,
}

impl AuthPolicy {
    pub fn new(default_credentials: Credentials) -> Self {
        Self {
            default_credentials,
            max_attempts: None,
            failure_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            default_credentials: Credentials::from(config),
            max_attempts: (config.max_login_attempts > 0).then_some(config.max_login_attempts),
            failure_delay: config.login_failure_delay(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = (max_attempts > 0).then_some(max_attempts);
        self
    }

    pub fn with_failure_delay(mut self, delay: Duration) -> Self {
        self.failure_delay = delay;
        self
    }

    /// Evaluates a username/password pair
    pub fn authenticate(&self, username: &str, password: &str) -> Result<LoginKind, AuthError> {
        if username == ANONYMOUS_USERNAME {
            return Ok(LoginKind::Anonymous);
        }

        if self.default_credentials.matches(username, password) {
            return Ok(LoginKind::Credentials);
        }

        Err(AuthError::InvalidCredentials(username.to_string()))
    }

    /// Fails once `failed_attempts` has reached the configured limit
    pub fn check_attempts(&self, failed_attempts: u32) -> Result<(), AuthError> {
        match self.max_attempts {
            Some(max) if failed_attempts >= max => Err(AuthError::TooManyAttempts(max)),
            _ => Ok(()),
        }
    }

    pub fn failure_delay(&self) -> Duration {
        self.failure_delay
    }
}

impl Default for AuthPolicy {
    fn default() -> Self {
        AuthPolicy::from_config(&AuthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_ignores_password() {
        let policy = AuthPolicy::default();
        assert_eq!(policy.authenticate("anon", "anything"), Ok(LoginKind::Anonymous));
        assert_eq!(policy.authenticate("anon", ""), Ok(LoginKind::Anonymous));
    }

    #[test]
    fn default_pair_must_match_exactly() {
        let policy = AuthPolicy::default();
        assert_eq!(policy.authenticate("user", "pass"), Ok(LoginKind::Credentials));
        assert_eq!(
            policy.authenticate("user", "wrong"),
            Err(AuthError::InvalidCredentials("user".into()))
        );
        assert!(policy.authenticate("USER", "pass").is_err());
        assert!(policy.authenticate("user", "pass ").is_err());
        assert!(policy.authenticate("", "").is_err());
    }

    #[test]
    fn anonymous_name_is_exact() {
        let policy = AuthPolicy::new(Credentials::new("admin", "secret"));
        assert_eq!(policy.authenticate("anon", "x"), Ok(LoginKind::Anonymous));
        assert!(policy.authenticate("ANON", "x").is_err());
        assert!(policy.authenticate("anonymous", "x").is_err());
        // PASS before any USER is checked against an empty name
        assert!(policy.authenticate("", "").is_err());
        assert!(policy.authenticate("", "secret").is_err());
    }

    #[test]
    fn attempts_are_unlimited_by_default() {
        let policy = AuthPolicy::default();
        assert!(policy.check_attempts(1_000).is_ok());

        let policy = policy.with_max_attempts(3);
        assert!(policy.check_attempts(2).is_ok());
        assert_eq!(policy.check_attempts(3), Err(AuthError::TooManyAttempts(3)));
    }
}
