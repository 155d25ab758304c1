//! FTP Protocol implementation
//!
//! Handles command tokenizing, PORT parsing, dispatch and response
//! formatting.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{Command, CommandLine, CommandStatus, parse_command, tokenize};
pub use handlers::{handle_command, send_response};
pub use parser::{parse_host_port, parse_port_command};
pub use responses::{Response, encode_response, format_response};
