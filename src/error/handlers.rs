//! Error handlers
//!
//! Maps the error taxonomy onto FTP reply codes and reply lines.

use crate::error::types::{AuthError, ConnectError, FtpServerError};
use crate::protocol::responses::{
    AUTH_FAILED, CANT_OPEN_DATA_CONNECTION, FILE_UNAVAILABLE, Response, SERVICE_NOT_AVAILABLE,
    SYNTAX_ERROR,
};
use log::error;

/// Log an FTP server error
pub fn handle_error(err: &FtpServerError) {
    error!("FTP Server Error: {}", err);
}

/// Convert error to FTP response code
pub fn error_to_ftp_code(err: &FtpServerError) -> u16 {
    match err {
        FtpServerError::Protocol(_) => SYNTAX_ERROR,
        FtpServerError::Auth(AuthError::TooManyAttempts(_)) => SERVICE_NOT_AVAILABLE,
        FtpServerError::Auth(_) => AUTH_FAILED,
        FtpServerError::Connect(_) => CANT_OPEN_DATA_CONNECTION,
        FtpServerError::Metadata(_) => FILE_UNAVAILABLE,
        FtpServerError::Transport(_) => SERVICE_NOT_AVAILABLE,
        FtpServerError::Config(_) => SERVICE_NOT_AVAILABLE,
        FtpServerError::InvalidRoot(_) => SERVICE_NOT_AVAILABLE,
    }
}

/// Builds the reply sent to the client for `err`
pub fn error_to_response(err: &FtpServerError) -> Response {
    let message = match err {
        FtpServerError::Protocol(e) => format!("Syntax error in parameters: {}.", e),
        FtpServerError::Auth(AuthError::InvalidCredentials(_)) => "Authentication failed.".into(),
        FtpServerError::Auth(AuthError::NotLoggedIn) => "Not logged in.".into(),
        FtpServerError::Auth(e @ AuthError::TooManyAttempts(_)) => {
            format!("{}, closing control connection.", e)
        }
        FtpServerError::Connect(ConnectError::Interrupted(_)) => "Data connection failed.".into(),
        FtpServerError::Connect(_) => "Can't open data connection.".into(),
        FtpServerError::Metadata(e) => format!("{}: {}.", e.path, e.source),
        FtpServerError::Transport(_)
        | FtpServerError::Config(_)
        | FtpServerError::InvalidRoot(_) => {
            "Service not available, closing control connection.".into()
        }
    };

    Response::new(error_to_ftp_code(err), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MetadataError, ParseError};
    use std::io;

    #[test]
    fn taxonomy_maps_to_reply_codes() {
        let parse = FtpServerError::from(ParseError::MalformedAddressList { fields: 5 });
        assert_eq!(error_to_ftp_code(&parse), 501);

        let auth = FtpServerError::from(AuthError::InvalidCredentials("bob".into()));
        assert_eq!(error_to_ftp_code(&auth), 530);

        let limit = FtpServerError::from(AuthError::TooManyAttempts(3));
        assert_eq!(error_to_ftp_code(&limit), 421);

        let connect = FtpServerError::from(ConnectError::NoEndpoint);
        assert_eq!(error_to_ftp_code(&connect), 425);

        let metadata = FtpServerError::from(MetadataError::new(
            "missing.txt",
            io::Error::from(io::ErrorKind::NotFound),
        ));
        assert_eq!(error_to_ftp_code(&metadata), 550);

        let transport = FtpServerError::from(io::Error::from(io::ErrorKind::ConnectionReset));
        assert_eq!(error_to_ftp_code(&transport), 421);
    }

    #[test]
    fn replies_carry_code_and_detail() {
        let reply = error_to_response(&FtpServerError::from(ParseError::InvalidEncoding));
        assert_eq!(
            reply.to_string(),
            "501 Syntax error in parameters: command line is not valid UTF-8."
        );

        let reply = error_to_response(&FtpServerError::from(AuthError::NotLoggedIn));
        assert_eq!(reply.encode(), b"530 Not logged in.\r\n".to_vec());

        let reply = error_to_response(&FtpServerError::from(ConnectError::Interrupted(
            io::Error::from(io::ErrorKind::BrokenPipe),
        )));
        assert_eq!(reply.code(), 425);
        assert_eq!(reply.message(), "Data connection failed.");

        let reply = error_to_response(&FtpServerError::from(MetadataError::new(
            "docs/gone.txt",
            io::Error::from(io::ErrorKind::NotFound),
        )));
        assert_eq!(reply.code(), 550);
        assert!(reply.message().starts_with("docs/gone.txt: "), "{}", reply);
    }
}
