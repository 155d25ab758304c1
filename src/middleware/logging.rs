//! Logging middleware
//!
//! Connection and command log lines. PASS arguments never reach the log.

use log::info;
use std::net::SocketAddr;

use crate::protocol::tokenize;

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr) {
    info!("Client connected: {}", client_addr);
}

/// Log a client disconnect
pub fn log_disconnect(client_addr: &SocketAddr) {
    info!("Client {} disconnected", client_addr);
}

/// Log a client command
pub fn log_command(client_addr: &SocketAddr, raw: &str) {
    info!("Received from {}: {}", client_addr, redact(raw));
}

/// Returns the line as it may be logged
pub fn redact(raw: &str) -> String {
    match tokenize(raw) {
        Some(line) if line.verb == "PASS" => "PASS ****".to_string(),
        Some(line) if line.argument.is_empty() => line.verb,
        Some(line) => format!("{} {}", line.verb, line.argument),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwords_are_masked() {
        assert_eq!(redact("PASS hunter2\r\n"), "PASS ****");
        assert_eq!(redact("pass hunter2\r\n"), "PASS ****");
        assert_eq!(redact("USER anon\r\n"), "USER anon");
        assert_eq!(redact("NOOP\r\n"), "NOOP");
    }
}
