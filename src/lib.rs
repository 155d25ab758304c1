//! tiny-ftpd
//!
//! A small FTP control/data engine: USER/PASS login, active-mode PORT
//! negotiation and `ls -l` style listings over the data connection.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;

pub use config::ServerConfig;
pub use server::Server;
