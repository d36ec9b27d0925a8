//! Network policy sanity: selectors that cover no pods and broken IP blocks.

use crate::issues::{Collector, FindingContext};
use crate::model::{IpBlock, NetworkPolicy, PolicyPeer, Record};
use crate::registry::kinds;
use crate::selector::{SelectorError, find_by_namespace_covering, find_namespaces};
use crate::types::ResourceKind;

use super::{Check, CheckContext, inspect};

#[derive(Debug, Clone)]
pub struct NetworkPolicyCheck {
    kind: ResourceKind,
    pods: ResourceKind,
    namespaces: ResourceKind,
}

impl Default for NetworkPolicyCheck {
    fn default() -> Self {
        Self {
            kind: ResourceKind::new(kinds::NETWORK_POLICIES),
            pods: ResourceKind::new(kinds::PODS),
            namespaces: ResourceKind::new(kinds::NAMESPACES),
        }
    }
}

impl NetworkPolicyCheck {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_policy(
        &self,
        ctx: &CheckContext<'_>,
        np: &NetworkPolicy,
        fctx: &FindingContext,
        c: &mut Collector,
    ) -> crate::Result<()> {
        let covered = find_by_namespace_covering(ctx.txn, &self.pods, np.namespace(), &np.pod_selector)?;
        if covered.is_empty() {
            c.add_code(fctx, 1200u32, &[])?;
        }

        let rules = np
            .ingress
            .iter()
            .map(|rule| ("ingress", rule))
            .chain(np.egress.iter().map(|rule| ("egress", rule)));
        for (direction, rule) in rules {
            for peer in &rule.peers {
                if let Some(block) = &peer.ip_block {
                    check_ip_block(fctx, block, c)?;
                }
                self.check_peer(ctx, np, direction, peer, fctx, c)?;
            }
        }
        Ok(())
    }

    fn check_peer(
        &self,
        ctx: &CheckContext<'_>,
        np: &NetworkPolicy,
        direction: &str,
        peer: &PolicyPeer,
        fctx: &FindingContext,
        c: &mut Collector,
    ) -> crate::Result<()> {
        let Some(pod_selector) = &peer.pod_selector else {
            return Ok(());
        };

        let namespaces: Vec<String> = match &peer.namespace_selector {
            // Namespace labels are unknown without the namespaces table.
            Some(_) if !ctx.txn.is_loaded(&self.namespaces)? => return Ok(()),
            Some(ns_selector) => find_namespaces(ctx.txn, &self.namespaces, ns_selector)?
                .into_iter()
                .map(|ns| ns.name().to_string())
                .collect(),
            None => vec![np.namespace().to_string()],
        };

        let mut matched = false;
        for ns in &namespaces {
            if !find_by_namespace_covering(ctx.txn, &self.pods, ns, pod_selector)?.is_empty() {
                matched = true;
                break;
            }
        }
        if !matched {
            let scope = if namespaces.is_empty() {
                "<none>".to_string()
            } else {
                namespaces.join(",")
            };
            c.add_code(fctx, 1203u32, &[&direction, &scope])?;
        }
        Ok(())
    }
}

/// Malformed blocks are reported on the policy rather than failing it.
fn check_ip_block(fctx: &FindingContext, block: &IpBlock, c: &mut Collector) -> crate::Result<()> {
    match block.validate() {
        Ok(()) => {}
        Err(SelectorError::ExceptOutsideBlock { except, cidr }) => {
            c.add_code(fctx, 1201u32, &[&except, &cidr])?;
        }
        Err(err) => {
            c.add_code(fctx, 1202u32, &[&err])?;
        }
    }
    Ok(())
}

impl Check for NetworkPolicyCheck {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn name(&self) -> &str {
        "networkpolicy"
    }

    fn run(&self, ctx: &CheckContext<'_>, collector: &mut Collector) -> crate::Result<()> {
        for np in ctx.txn.scan_as::<NetworkPolicy>(&self.kind)? {
            let fctx = FindingContext::from_record(&self.kind, np);
            inspect(collector, &fctx, |c| self.check_policy(ctx, np, &fctx, c));
        }
        Ok(())
    }
}
