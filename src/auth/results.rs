//! Authentication result types

/// Which rule let the user in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Anonymous,
    Credentials,
}
