//! FTP Response handling
//!
//! Defines FTP response codes and the `<code> <text>\r\n` wire format.

use std::fmt;

/// Standard FTP response codes
pub const DATA_CONNECTION_OPEN: u16 = 150;
pub const OK: u16 = 200;
pub const SYSTEM_TYPE: u16 = 215;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const LOGIN_SUCCESS: u16 = 230;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const SERVICE_NOT_AVAILABLE: u16 = 421;
pub const CANT_OPEN_DATA_CONNECTION: u16 = 425;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR: u16 = 501;
pub const PARAMETER_NOT_IMPLEMENTED: u16 = 504;
pub const AUTH_FAILED: u16 = 530;
pub const FILE_UNAVAILABLE: u16 = 550;

/// Format an FTP response message
///
/// The message must not contain CR or LF; nothing here sanitizes it.
pub fn format_response(code: u16, message: &str) -> String {
    debug_assert!((100..=599).contains(&code), "reply code {} out of range", code);
    format!("{} {}\r\n", code, message)
}

/// Same as [`format_response`], ready to be written to a socket
pub fn encode_response(code: u16, message: &str) -> Vec<u8> {
    format_response(code, message).into_bytes()
}

/// A single reply line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    code: u16,
    message: String,
}

impl Response {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_response(self.code, &self.message)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}
