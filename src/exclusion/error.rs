//! Suppression rule error types.

/// Raised while building suppression rules. Matching itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum ExclusionError {
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Empty regex pattern after '{marker}' marker")]
    EmptyPattern { marker: &'static str },
}
