//! Findings: the code glossary, the per-check collector and its outcome.

mod codes;
mod collector;
mod context;
mod error;
mod finding;
mod outcome;
mod severity;

pub use codes::{CodeGlossary, CodeSpec, DEFAULT_PREFIX, INTERNAL_ERROR};
pub use collector::Collector;
pub use context::FindingContext;
pub use error::IssueError;
pub use finding::{Finding, ROOT_GROUP};
pub use outcome::Outcome;
pub use severity::Severity;
