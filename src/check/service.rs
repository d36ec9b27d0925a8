//! Service sanity: every selector should land on at least one pod.

use crate::issues::{Collector, FindingContext};
use crate::model::{Record, Service};
use crate::registry::kinds;
use crate::selector::{LabelSelector, find_by_namespace_and_selector};
use crate::types::ResourceKind;

use super::{Check, CheckContext, inspect};

#[derive(Debug, Clone)]
pub struct ServiceCheck {
    kind: ResourceKind,
    pods: ResourceKind,
}

impl Default for ServiceCheck {
    fn default() -> Self {
        Self {
            kind: ResourceKind::new(kinds::SERVICES),
            pods: ResourceKind::new(kinds::PODS),
        }
    }
}

impl ServiceCheck {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_service(
        &self,
        ctx: &CheckContext<'_>,
        svc: &Service,
        fctx: &FindingContext,
        c: &mut Collector,
    ) -> crate::Result<()> {
        if svc.is_external_name() {
            return Ok(());
        }
        if svc.selector.is_empty() {
            c.add_code(fctx, 1101u32, &[])?;
            return Ok(());
        }

        let selector = LabelSelector {
            match_labels: svc.selector.clone(),
            ..LabelSelector::default()
        };
        let pods = find_by_namespace_and_selector(ctx.txn, &self.pods, svc.namespace(), &selector)?;
        if pods.is_empty() {
            c.add_code(fctx, 1100u32, &[])?;
        }
        Ok(())
    }
}

impl Check for ServiceCheck {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn name(&self) -> &str {
        "service"
    }

    fn run(&self, ctx: &CheckContext<'_>, collector: &mut Collector) -> crate::Result<()> {
        for svc in ctx.txn.scan_as::<Service>(&self.kind)? {
            let fctx = FindingContext::from_record(&self.kind, svc);
            inspect(collector, &fctx, |c| self.check_service(ctx, svc, &fctx, c));
        }
        Ok(())
    }
}
