//! Module `state`
//!
//! Defines `ClientSession`, the per-connection protocol state: credentials,
//! login state, transfer mode and the active-mode data endpoint/connection.

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::auth::{AuthPolicy, LoginKind};
use crate::error::handlers::error_to_response;
use crate::error::{AuthError, ConnectError, FtpServerError, ParseError};
use crate::protocol::parser::parse_port_command;
use crate::protocol::responses::{
    LOGIN_SUCCESS, OK, PARAMETER_NOT_IMPLEMENTED, PASSWORD_REQUIRED, Response,
};
use crate::transfer::{DataEndpoint, TransferMode, open_active};

/// Login progress of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginState {
    #[default]
    Unauthenticated,
    AwaitingPassword,
    Authenticated,
}

/// State of a single control connection.
///
/// Owned by exactly one connection task. An open data connection is closed
/// when it is replaced, closed explicitly, or when the session is dropped.
pub struct ClientSession {
    username: String,
    password: String,
    login_state: LoginState,
    failed_logins: u32,
    transfer_mode: TransferMode,
    data_endpoint: Option<DataEndpoint>,
    data_connection: Option<TcpStream>,
    policy: Arc<AuthPolicy>,
}

impl ClientSession {
    pub fn new(policy: Arc<AuthPolicy>) -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            login_state: LoginState::default(),
            failed_logins: 0,
            transfer_mode: TransferMode::default(),
            data_endpoint: None,
            data_connection: None,
            policy,
        }
    }

    // --------------------
    // Command handlers
    // --------------------

    /// USER: stores the name and always asks for a password, whatever the
    /// name looks like.
    pub fn handle_user(&mut self, username: &str) -> Response {
        self.username = clean_argument(username);
        self.password.clear();
        self.login_state = LoginState::AwaitingPassword;

        info!("Username: {:?}", self.username);
        Response::new(PASSWORD_REQUIRED, "User name okay, need password.")
    }

    /// PASS: stores the password and evaluates the credential policy. The
    /// outcome replaces any earlier login.
    pub fn handle_pass(&mut self, password: &str) -> Response {
        self.password = clean_argument(password);

        match self.policy.authenticate(&self.username, &self.password) {
            Ok(kind) => {
                self.login_state = LoginState::Authenticated;
                self.failed_logins = 0;
                info!("User {:?} logged in ({:?})", self.username, kind);
                match kind {
                    LoginKind::Anonymous => {
                        Response::new(LOGIN_SUCCESS, "Login successful for anonymous user.")
                    }
                    LoginKind::Credentials => {
                        Response::new(LOGIN_SUCCESS, "Login successful.")
                    }
                }
            }
            Err(e) => {
                self.login_state = LoginState::Unauthenticated;
                self.failed_logins = self.failed_logins.saturating_add(1);
                warn!("{} (attempt {})", e, self.failed_logins);
                error_to_response(&FtpServerError::from(e))
            }
        }
    }

    /// PORT: parses the full `PORT h1,h2,h3,h4,p1,p2` line and stores the
    /// endpoint, superseding and closing any previous data connection. The
    /// caller answers 200 or 501.
    pub fn handle_port(&mut self, line: &str) -> Result<DataEndpoint, ParseError> {
        let endpoint = parse_port_command(line)?;

        if self.close_data_connection() {
            info!("Closed data connection superseded by PORT {}", endpoint);
        }
        self.data_endpoint = Some(endpoint);

        Ok(endpoint)
    }

    /// TYPE: switches between ASCII and binary representation.
    pub fn handle_type(&mut self, argument: &str) -> Response {
        match TransferMode::from_type_code(argument) {
            Some(mode) => {
                self.transfer_mode = mode;
                Response::new(OK, format!("Switching to {} mode.", mode.name()))
            }
            None => Response::new(
                PARAMETER_NOT_IMPLEMENTED,
                "Command not implemented for that parameter.",
            ),
        }
    }

    /// Reply sent when the failed login limit has been reached
    pub fn login_limit_response(&self, error: AuthError) -> Response {
        error_to_response(&FtpServerError::from(error))
    }

    /// Checks the failed login counter against the policy
    pub fn check_login_attempts(&self) -> Result<(), AuthError> {
        self.policy.check_attempts(self.failed_logins)
    }

    pub fn login_failure_delay(&self) -> Duration {
        self.policy.failure_delay()
    }

    // --------------------
    // Data connection
    // --------------------

    /// Opens the active-mode data connection to the stored endpoint,
    /// replacing any connection that is still open.
    pub async fn open_data_connection(&mut self, timeout: Duration) -> Result<(), ConnectError> {
        let endpoint = self.data_endpoint.ok_or(ConnectError::NoEndpoint)?;
        self.close_data_connection();

        let stream = open_active(endpoint, timeout).await?;
        self.data_connection = Some(stream);
        Ok(())
    }

    /// Hands the open data connection to the caller
    pub fn take_data_connection(&mut self) -> Option<TcpStream> {
        self.data_connection.take()
    }

    /// Drops the open data connection, if any. Returns whether one was open.
    pub fn close_data_connection(&mut self) -> bool {
        self.data_connection.take().is_some()
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn login_state(&self) -> LoginState {
        self.login_state
    }

    pub fn is_authenticated(&self) -> bool {
        self.login_state == LoginState::Authenticated
    }

    pub fn failed_logins(&self) -> u32 {
        self.failed_logins
    }

    pub fn transfer_mode(&self) -> TransferMode {
        self.transfer_mode
    }

    pub fn data_endpoint(&self) -> Option<DataEndpoint> {
        self.data_endpoint
    }

    pub fn has_data_connection(&self) -> bool {
        self.data_connection.is_some()
    }
}

/// Strips CR/LF and surrounding whitespace from a command argument
fn clean_argument(argument: &str) -> String {
    argument.trim_end_matches(['\r', '\n']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::protocol::commands::tokenize;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    fn session() -> ClientSession {
        ClientSession::new(Arc::new(AuthPolicy::default()))
    }

    fn arg(line: &str) -> String {
        tokenize(line).unwrap().argument
    }

    #[test]
    fn new_session_is_empty() {
        let session = session();
        assert_eq!(session.username(), "");
        assert_eq!(session.password(), "");
        assert!(!session.is_authenticated());
        assert_eq!(session.transfer_mode(), TransferMode::Binary);
        assert_eq!(session.data_endpoint(), None);
        assert!(!session.has_data_connection());
    }

    #[test]
    fn user_always_answers_331() {
        let mut session = session();
        let response = session.handle_user(&arg("USER bob\r\n"));
        assert_eq!(response.code(), 331);
        assert_eq!(session.username(), "bob");
        assert_eq!(session.login_state(), LoginState::AwaitingPassword);

        let response = session.handle_user("");
        assert_eq!(response.code(), 331);
        assert_eq!(session.username(), "");

        session.handle_user("  padded \r\n");
        assert_eq!(session.username(), "padded");
    }

    #[test]
    fn anonymous_login_accepts_any_password() {
        let mut session = session();
        session.handle_user(&arg("USER anon\r\n"));
        let response = session.handle_pass(&arg("PASS anything\r\n"));
        assert_eq!(response.code(), 230);
        assert!(session.is_authenticated());
    }

    #[test]
    fn default_credentials_login() {
        let mut session = session();
        session.handle_user(&arg("USER user\r\n"));
        let response = session.handle_pass(&arg("PASS pass\r\n"));
        assert_eq!(response.code(), 230);
        assert!(session.is_authenticated());
        assert_eq!(session.password(), "pass");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let mut session = session();
        session.handle_user(&arg("USER user\r\n"));
        let response = session.handle_pass(&arg("PASS wrong\r\n"));
        assert_eq!(response.code(), 530);
        assert!(!session.is_authenticated());
        assert_eq!(session.login_state(), LoginState::Unauthenticated);
        assert_eq!(session.failed_logins(), 1);
    }

    #[test]
    fn pass_without_user_fails() {
        let mut session = session();
        let response = session.handle_pass("pass");
        assert_eq!(response.code(), 530);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn reauthentication_replaces_outcome() {
        let mut session = session();
        session.handle_user("user");
        session.handle_pass("pass");
        assert!(session.is_authenticated());

        session.handle_user("user");
        assert!(!session.is_authenticated());
        session.handle_pass("wrong");
        assert!(!session.is_authenticated());

        session.handle_user("anon");
        session.handle_pass("");
        assert!(session.is_authenticated());
        assert_eq!(session.failed_logins(), 0);
    }

    #[test]
    fn retries_are_unlimited_unless_configured() {
        let mut session = session();
        for _ in 0..20 {
            session.handle_user("user");
            session.handle_pass("wrong");
        }
        assert!(session.check_login_attempts().is_ok());

        let policy = AuthPolicy::new(Credentials::new("admin", "secret"))
            .with_max_attempts(2)
            .with_failure_delay(Duration::from_millis(5));
        let mut session = ClientSession::new(Arc::new(policy));
        session.handle_user("admin");
        assert_eq!(session.handle_pass("x").code(), 530);
        assert!(session.check_login_attempts().is_ok());
        session.handle_pass("y");
        let err = session.check_login_attempts().unwrap_err();
        assert_eq!(session.login_limit_response(err).code(), 421);
        assert_eq!(session.login_failure_delay(), Duration::from_millis(5));
    }

    #[test]
    fn sessions_do_not_share_login_state() {
        let policy = Arc::new(AuthPolicy::default());
        let mut alice = ClientSession::new(Arc::clone(&policy));
        let mut mallory = ClientSession::new(Arc::clone(&policy));

        alice.handle_user("user");
        mallory.handle_user("user");
        alice.handle_pass("pass");
        mallory.handle_pass("guess");

        assert!(alice.is_authenticated());
        assert!(!mallory.is_authenticated());
        assert_eq!(alice.failed_logins(), 0);
        assert_eq!(mallory.failed_logins(), 1);
    }

    #[test]
    fn port_stores_and_supersedes_endpoint() {
        let mut session = session();
        let endpoint = session.handle_port("PORT 127,0,0,1,19,136").unwrap();
        assert_eq!(endpoint, DataEndpoint::new(Ipv4Addr::LOCALHOST, 5000));
        assert_eq!(session.data_endpoint(), Some(endpoint));

        session.handle_port("PORT 10,0,0,2,0,21\r\n").unwrap();
        assert_eq!(
            session.data_endpoint(),
            Some(DataEndpoint::new(Ipv4Addr::new(10, 0, 0, 2), 21))
        );

        assert!(session.handle_port("PORT 10,0,0,2,0").is_err());
        assert_eq!(
            session.data_endpoint(),
            Some(DataEndpoint::new(Ipv4Addr::new(10, 0, 0, 2), 21))
        );
    }

    #[test]
    fn port_requires_exactly_one_space_after_verb() {
        let mut session = session();
        assert_eq!(
            session.handle_port("PORT  127,0,0,1,19,136"),
            Err(ParseError::MissingVerb("PORT"))
        );
        assert_eq!(session.data_endpoint(), None);
    }

    #[test]
    fn type_switches_mode() {
        let mut session = session();
        assert_eq!(session.handle_type("A").code(), 200);
        assert_eq!(session.transfer_mode(), TransferMode::Ascii);
        assert_eq!(session.handle_type("I").code(), 200);
        assert_eq!(session.transfer_mode(), TransferMode::Binary);
        assert_eq!(session.handle_type("X").code(), 504);
        assert_eq!(session.transfer_mode(), TransferMode::Binary);
    }

    #[tokio::test]
    async fn data_connection_requires_port() {
        let mut session = session();
        let err = session
            .open_data_connection(Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::NoEndpoint));
    }

    #[tokio::test]
    async fn new_port_closes_open_data_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut session = session();
        session
            .handle_port(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
            .unwrap();
        session.open_data_connection(Duration::from_secs(2)).await.unwrap();
        assert!(session.has_data_connection());

        session.handle_port("PORT 127,0,0,1,0,1").unwrap();
        assert!(!session.has_data_connection());
    }
}
