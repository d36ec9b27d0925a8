//! Crate-level error type.
//!
//! Each layer owns a narrow error enum; `SanityError` wraps them so check
//! routines can use `?` across layers.

use thiserror::Error;

use crate::config::ConfigError;
use crate::exclusion::ExclusionError;
use crate::issues::IssueError;
use crate::selector::SelectorError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SanityError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("Exclusion error: {0}")]
    Exclusion(#[from] ExclusionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Issue error: {0}")]
    Issue(#[from] IssueError),

    /// A record did not have the shape a check expected.
    #[error("Unexpected record shape for {fqn}: {message}")]
    UnexpectedShape { fqn: String, message: String },
}

pub type Result<T> = std::result::Result<T, SanityError>;
