//! FTP Transfer modes
//!
//! Representation type selected with TYPE and the active-mode endpoint
//! selected with PORT.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Representation type for data transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Binary,
    Ascii,
}

impl TransferMode {
    /// Maps a TYPE argument (`A`, `A N`, `I`, ...) to a mode
    pub fn from_type_code(code: &str) -> Option<Self> {
        match code.split_whitespace().next()?.to_ascii_uppercase().as_str() {
            "A" => Some(TransferMode::Ascii),
            "I" | "L" => Some(TransferMode::Binary),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransferMode::Binary => "Binary",
            TransferMode::Ascii => "ASCII",
        }
    }
}

/// Client-advertised address for an active-mode data connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEndpoint {
    address: Ipv4Addr,
    port: u16,
}

impl DataEndpoint {
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self { address, port }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.address, self.port))
    }
}

impl fmt::Display for DataEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes() {
        assert_eq!(TransferMode::from_type_code("A"), Some(TransferMode::Ascii));
        assert_eq!(TransferMode::from_type_code("a N"), Some(TransferMode::Ascii));
        assert_eq!(TransferMode::from_type_code("I"), Some(TransferMode::Binary));
        assert_eq!(TransferMode::from_type_code("E"), None);
        assert_eq!(TransferMode::from_type_code(""), None);
        assert_eq!(TransferMode::default(), TransferMode::Binary);
    }
}
