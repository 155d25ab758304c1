//! Error types
//!
//! Defines the error taxonomy of the server. Every variant except
//! `FtpServerError::Transport` is answered with a reply code and the
//! session carries on.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::transfer::DataEndpoint;

/// Malformed command syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not start with the expected verb and a single space
    MissingVerb(&'static str),
    /// The address list does not have exactly six fields
    MalformedAddressList { fields: usize },
    /// A field is not a base-10 integer
    InvalidField { index: usize, value: String },
    /// A field is numeric but outside 0..=255
    OutOfRange { index: usize, value: String },
    /// The command line is not valid UTF-8
    InvalidEncoding,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingVerb(verb) => write!(f, "expected \"{} <argument>\"", verb),
            ParseError::MalformedAddressList { fields } => {
                write!(f, "malformed address list ({} fields, expected 6)", fields)
            }
            ParseError::InvalidField { index, value } => {
                write!(f, "field {} is not a number: {:?}", index + 1, value)
            }
            ParseError::OutOfRange { index, value } => {
                write!(f, "field {} is out of range 0-255: {}", index + 1, value)
            }
            ParseError::InvalidEncoding => write!(f, "command line is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Credential check failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials(String),
    TooManyAttempts(u32),
    NotLoggedIn,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials(u) => write!(f, "Invalid credentials for user: {:?}", u),
            AuthError::TooManyAttempts(n) => write!(f, "Too many failed login attempts ({})", n),
            AuthError::NotLoggedIn => write!(f, "Not logged in"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Failure to open the active-mode data connection
#[derive(Debug)]
pub enum ConnectError {
    /// No PORT command has been accepted on this session yet
    NoEndpoint,
    TimedOut {
        endpoint: DataEndpoint,
        timeout: Duration,
    },
    Io {
        endpoint: DataEndpoint,
        source: io::Error,
    },
    /// The connection was open but writing to it failed
    Interrupted(io::Error),
}

impl ConnectError {
    pub fn endpoint(&self) -> Option<DataEndpoint> {
        match self {
            ConnectError::NoEndpoint | ConnectError::Interrupted(_) => None,
            ConnectError::TimedOut { endpoint, .. } | ConnectError::Io { endpoint, .. } => {
                Some(*endpoint)
            }
        }
    }
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::NoEndpoint => write!(f, "No data endpoint, send PORT first"),
            ConnectError::TimedOut { endpoint, timeout } => {
                write!(f, "Timed out after {:?} connecting to {}", timeout, endpoint)
            }
            ConnectError::Io { endpoint, source } => {
                write!(f, "Failed to connect to {}: {}", endpoint, source)
            }
            ConnectError::Interrupted(source) => write!(f, "Data connection failed: {}", source),
        }
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectError::Io { source, .. } | ConnectError::Interrupted(source) => Some(source),
            ConnectError::NoEndpoint | ConnectError::TimedOut { .. } => None,
        }
    }
}

/// Metadata lookup failure for a listed path
#[derive(Debug)]
pub struct MetadataError {
    pub path: String,
    pub source: io::Error,
}

impl MetadataError {
    pub fn new(path: impl Into<String>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot read metadata for {}: {}", self.path, self.source)
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// General server error that encompasses all error types
#[derive(Debug)]
pub enum FtpServerError {
    Protocol(ParseError),
    Auth(AuthError),
    Connect(ConnectError),
    Metadata(MetadataError),
    /// Read or write failure on the control connection itself
    Transport(io::Error),
    Config(String),
    InvalidRoot(PathBuf),
}

impl fmt::Display for FtpServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpServerError::Protocol(e) => write!(f, "Protocol error: {}", e),
            FtpServerError::Auth(e) => write!(f, "Authentication error: {}", e),
            FtpServerError::Connect(e) => write!(f, "Data connection error: {}", e),
            FtpServerError::Metadata(e) => write!(f, "Metadata error: {}", e),
            FtpServerError::Transport(e) => write!(f, "Transport error: {}", e),
            FtpServerError::Config(e) => write!(f, "Configuration error: {}", e),
            FtpServerError::InvalidRoot(p) => write!(f, "Invalid server root: {}", p.display()),
        }
    }
}

impl std::error::Error for FtpServerError {}

impl From<ParseError> for FtpServerError {
    fn from(error: ParseError) -> Self {
        FtpServerError::Protocol(error)
    }
}

impl From<AuthError> for FtpServerError {
    fn from(error: AuthError) -> Self {
        FtpServerError::Auth(error)
    }
}

impl From<ConnectError> for FtpServerError {
    fn from(error: ConnectError) -> Self {
        FtpServerError::Connect(error)
    }
}

impl From<MetadataError> for FtpServerError {
    fn from(error: MetadataError) -> Self {
        FtpServerError::Metadata(error)
    }
}

impl From<io::Error> for FtpServerError {
    fn from(error: io::Error) -> Self {
        FtpServerError::Transport(error)
    }
}

impl From<config::ConfigError> for FtpServerError {
    fn from(error: config::ConfigError) -> Self {
        FtpServerError::Config(error.to_string())
    }
}
