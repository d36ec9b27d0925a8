//! Per-kind suppression configuration.

use serde::Serialize;

use super::error::ExclusionError;
use super::exclude::Exclude;
use super::expression::Expressions;
use super::spec::Spec;

/// Suppressions scoped to one resource kind: codes silenced for every
/// object of the kind, plus strict-mode rule instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinterExcludes {
    pub codes: Expressions,
    pub instances: Vec<Exclude>,
}

impl LinterExcludes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes<I, S>(mut self, raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.codes = Expressions::parse(raw)?;
        Ok(self)
    }

    pub fn with_instance(mut self, instance: Exclude) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.instances.iter().all(Exclude::is_empty)
    }

    pub fn matches(&self, spec: &Spec) -> bool {
        if spec.is_empty() {
            return false;
        }
        if self.instances.iter().any(|ex| ex.match_strict(spec)) {
            return true;
        }

        spec.code
            .is_some_and(|code| self.codes.matches(&code.to_string()))
    }
}
