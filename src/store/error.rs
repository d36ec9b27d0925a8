//! Store error types.

use crate::types::ResourceKind;

/// Misuse of the store. A missing key in a known table is not an error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown resource kind: {0}")]
    UnknownKind(ResourceKind),

    #[error("Record of kind {record} cannot be stored in table {table}")]
    KindMismatch {
        table: ResourceKind,
        record: ResourceKind,
    },
}
