//! Hierarchical suppression engine.
//!
//! Findings are checked against the global rule first (glob mode, any
//! category is enough), then against the rule for the finding's kind
//! (strict mode, every present category must match, or a kind-wide code).
//! Patterns are compiled when rules are built, so matching cannot fail.

mod error;
mod exclude;
mod expression;
mod linter;
mod spec;

pub use error::ExclusionError;
pub use exclude::Exclude;
pub use expression::{Expression, Expressions, REGEX_MARKER};
pub use linter::LinterExcludes;
pub use spec::Spec;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::trace;

use crate::types::ResourceKind;

/// The whole suppression document, compiled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Exclusions {
    pub global: Exclude,
    pub linters: FxHashMap<ResourceKind, LinterExcludes>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, global: Exclude) -> Self {
        self.global = global;
        self
    }

    pub fn with_linter(mut self, kind: impl Into<ResourceKind>, linter: LinterExcludes) -> Self {
        self.linters.insert(kind.into(), linter);
        self
    }

    pub fn linter(&self, kind: &ResourceKind) -> Option<&LinterExcludes> {
        self.linters.get(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.linters.values().all(LinterExcludes::is_empty)
    }

    /// Decide whether a finding described by `spec` is silenced.
    pub fn is_excluded(&self, spec: &Spec) -> bool {
        if spec.is_empty() {
            return false;
        }

        if self.global.match_glob(spec) {
            trace!(kind = %spec.kind, fqn = %spec.fqn, code = ?spec.code, "Excluded by global rule");
            return true;
        }

        let excluded = self
            .linters
            .get(&spec.kind)
            .is_some_and(|linter| linter.matches(spec));
        if excluded {
            trace!(kind = %spec.kind, fqn = %spec.fqn, code = ?spec.code, "Excluded by kind rule");
        }
        excluded
    }
}
