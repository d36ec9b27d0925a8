use thiserror::Error;

use crate::types::{Code, Fqn, ResourceKind};

/// Wiring bugs in a check: reporting against an object that was never
/// registered, or with a code the glossary does not know.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error("Finding reported for unregistered object {kind}/{fqn}")]
    UnregisteredFqn { kind: ResourceKind, fqn: Fqn },

    #[error("Unknown finding code: {0}")]
    UnknownCode(Code),
}
