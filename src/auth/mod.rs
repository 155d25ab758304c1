//! Authentication system
//!
//! Handles credential validation for USER/PASS.

pub mod credentials;
pub mod results;
pub mod validator;

pub use credentials::Credentials;
pub use results::LoginKind;
pub use validator::AuthPolicy;
