//! Finding counts rolled up by code, namespace and kind.
//!
//! Tallies from independently run checks are combined with `merge`, which is
//! commutative and associative, so the order in which workers finish does
//! not matter. `compact` removes zero counts and then any branch they leave
//! empty.

mod code;
mod namespace;
mod severity;

pub use code::CodeTally;
pub use namespace::{LinterTally, NamespaceTally};
pub use severity::{Grade, SeverityTally};
