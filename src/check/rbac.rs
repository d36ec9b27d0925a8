//! Binding sanity: subjects must exist. Runs for both namespaced and
//! cluster-wide bindings.

use crate::issues::{Collector, FindingContext};
use crate::model::{Record, RoleBinding};
use crate::registry::kinds;
use crate::selector::fqn;
use crate::types::ResourceKind;

use super::{Check, CheckContext, inspect};

#[derive(Debug, Clone)]
pub struct RoleBindingCheck {
    kind: ResourceKind,
    accounts: ResourceKind,
}

impl Default for RoleBindingCheck {
    fn default() -> Self {
        Self::for_kind(kinds::ROLE_BINDINGS)
    }
}

impl RoleBindingCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster() -> Self {
        Self::for_kind(kinds::CLUSTER_ROLE_BINDINGS)
    }

    pub fn for_kind(kind: impl Into<ResourceKind>) -> Self {
        Self {
            kind: kind.into(),
            accounts: ResourceKind::new(kinds::SERVICE_ACCOUNTS),
        }
    }

    fn check_binding(
        &self,
        ctx: &CheckContext<'_>,
        binding: &RoleBinding,
        fctx: &FindingContext,
        c: &mut Collector,
        accounts_loaded: bool,
    ) -> crate::Result<()> {
        if binding.subjects.is_empty() {
            c.add_code(fctx, 1301u32, &[])?;
            return Ok(());
        }
        if !accounts_loaded {
            return Ok(());
        }

        for subject in binding.subjects.iter().filter(|s| s.is_service_account()) {
            let namespace = if subject.namespace.is_empty() {
                binding.namespace()
            } else {
                subject.namespace.as_str()
            };
            let account = fqn(namespace, &subject.name);
            if ctx.txn.get(&self.accounts, account.as_str())?.is_none() {
                c.add_code(fctx, 1300u32, &[&account])?;
            }
        }
        Ok(())
    }
}

impl Check for RoleBindingCheck {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn run(&self, ctx: &CheckContext<'_>, collector: &mut Collector) -> crate::Result<()> {
        let accounts_loaded = ctx.txn.is_loaded(&self.accounts)?;
        for binding in ctx.txn.scan_as::<RoleBinding>(&self.kind)? {
            let fctx = FindingContext::from_record(&self.kind, binding);
            inspect(collector, &fctx, |c| {
                self.check_binding(ctx, binding, &fctx, c, accounts_loaded)
            });
        }
        Ok(())
    }
}
