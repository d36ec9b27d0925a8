pub mod check;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod issues;
pub mod model;
pub mod registry;
pub mod selector;
pub mod store;
pub mod tally;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use check::{Check, CheckContext, Report, Runner};
pub use config::{Config, ConfigError};
pub use error::{Result, SanityError};
pub use exclusion::{Exclude, Exclusions, LinterExcludes, Spec};
pub use issues::{CodeGlossary, Collector, Finding, FindingContext, Outcome, Severity};
pub use model::{Record, Resource, TypedRecord};
pub use registry::KindRegistry;
pub use store::{ReadTxn, Store, WriteTxn};
pub use tally::{CodeTally, Grade, LinterTally, NamespaceTally, SeverityTally};
pub use types::{Code, Fqn, ResourceKind};
