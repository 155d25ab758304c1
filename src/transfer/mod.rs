//! Transfer module for FTP server
//!
//! Handles the active-mode data channel and the session's transfer mode.

pub mod data_channel;
pub mod modes;

pub use data_channel::{DEFAULT_CONNECT_TIMEOUT, open_active};
pub use modes::{DataEndpoint, TransferMode};
