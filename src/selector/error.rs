//! Selector library error types.

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Invalid CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("Invalid IP address '{0}'")]
    InvalidIp(String),

    #[error("Except block {except} is not contained in {cidr}")]
    ExceptOutsideBlock { except: String, cidr: String },
}
