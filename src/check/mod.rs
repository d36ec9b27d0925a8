//! Check routines and the runner that executes them.
//!
//! A check reads one kind's table through a [`CheckContext`] and reports
//! into its own [`Collector`]. Failures on a single object are turned into
//! internal-error findings by [`inspect`] so the remaining objects are
//! still checked.

mod network_policy;
mod pod;
mod rbac;
mod runner;
mod service;

pub use network_policy::NetworkPolicyCheck;
pub use pod::PodCheck;
pub use rbac::RoleBindingCheck;
pub use runner::{CheckFailure, Report, Runner};
pub use service::ServiceCheck;

use tracing::warn;

use crate::issues::{Collector, FindingContext};
use crate::registry::KindRegistry;
use crate::store::ReadTxn;
use crate::types::ResourceKind;

/// What every check gets to read.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub txn: &'a ReadTxn,
}

impl<'a> CheckContext<'a> {
    pub fn new(txn: &'a ReadTxn) -> Self {
        Self { txn }
    }

    pub fn registry(&self) -> &'a KindRegistry {
        self.txn.registry()
    }
}

/// A check over the records of one kind.
pub trait Check: Send + Sync {
    /// The table this check walks.
    fn kind(&self) -> &ResourceKind;

    fn name(&self) -> &str;

    /// Errors returned here abort this check only. Per-object failures
    /// should go through [`inspect`] instead.
    fn run(&self, ctx: &CheckContext<'_>, collector: &mut Collector) -> crate::Result<()>;
}

/// Register `fctx.fqn` and run `visit` for it. An error from `visit`
/// becomes an internal-error finding on that object.
pub fn inspect<F>(collector: &mut Collector, fctx: &FindingContext, visit: F)
where
    F: FnOnce(&mut Collector) -> crate::Result<()>,
{
    collector.init_outcome(fctx.fqn.clone());
    if let Err(err) = visit(collector) {
        warn!(kind = %fctx.kind, fqn = %fctx.fqn, error = %err, "Object check failed");
        collector.add_err(fctx, &err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SanityError;
    use crate::issues::{INTERNAL_ERROR, Severity};
    use crate::test_utils::fixtures::collector;

    #[test]
    fn test_inspect_converts_error() {
        let mut c = collector("pods");
        let fctx = FindingContext::new("pods", "default/p1");
        inspect(&mut c, &fctx, |_| {
            Err(SanityError::UnexpectedShape {
                fqn: "default/p1".to_string(),
                message: "broken".to_string(),
            })
        });

        let findings = c.outcome().get("default/p1").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, Some(INTERNAL_ERROR));
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("broken"));
    }

    #[test]
    fn test_inspect_registers_clean_object() {
        let mut c = collector("pods");
        inspect(&mut c, &FindingContext::new("pods", "default/p1"), |_| Ok(()));
        assert_eq!(c.outcome().get("default/p1").map(<[_]>::len), Some(0));
    }
}
