//! Server core functionality
//!
//! The listener, its accept loop and the settings shared with sessions.

pub mod context;
pub mod core;

pub use self::context::ServerContext;
pub use self::core::Server;
