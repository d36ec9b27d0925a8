//! Pod sanity: labels, owners, service account and per-container hygiene.

use crate::error::SanityError;
use crate::issues::{Collector, FindingContext};
use crate::model::{
    Container, Pod, QuantityError, Record, parse_cpu_millis, parse_memory_bytes,
};
use crate::registry::kinds;
use crate::selector::{OwnerLookup, fqn, resolve_owner};
use crate::types::ResourceKind;

use super::{Check, CheckContext, inspect};

const DEFAULT_ACCOUNT: &str = "default";

type QuantityParser = fn(&str) -> Result<u64, QuantityError>;

/// Request/limit pairs compared per container, with the code raised when
/// the request is larger.
const RATIOS: [(&str, QuantityParser, u32); 2] = [
    ("cpu", parse_cpu_millis, 109),
    ("memory", parse_memory_bytes, 110),
];

#[derive(Debug, Clone)]
pub struct PodCheck {
    kind: ResourceKind,
    accounts: ResourceKind,
}

impl Default for PodCheck {
    fn default() -> Self {
        Self {
            kind: ResourceKind::new(kinds::PODS),
            accounts: ResourceKind::new(kinds::SERVICE_ACCOUNTS),
        }
    }
}

impl PodCheck {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_pod(
        &self,
        ctx: &CheckContext<'_>,
        pod: &Pod,
        fctx: &FindingContext,
        c: &mut Collector,
        accounts_loaded: bool,
    ) -> crate::Result<()> {
        if pod.labels().is_empty() {
            c.add_code(fctx, 200u32, &[])?;
        }

        for owner in &pod.metadata.owner_references {
            if resolve_owner(ctx.txn, pod.namespace(), owner)? == OwnerLookup::Missing {
                let owner_fqn = fqn(pod.namespace(), &owner.name);
                c.add_code(fctx, 208u32, &[&owner.kind, &owner_fqn])?;
            }
        }

        let account = match pod.service_account_name.as_str() {
            "" => DEFAULT_ACCOUNT,
            name => name,
        };
        if account == DEFAULT_ACCOUNT {
            c.add_code(fctx, 300u32, &[])?;
        } else if accounts_loaded {
            let account_fqn = fqn(pod.namespace(), account);
            if ctx.txn.get(&self.accounts, account_fqn.as_str())?.is_none() {
                c.add_code(fctx, 1300u32, &[&account_fqn])?;
            }
        }

        for container in &pod.init_containers {
            check_container(fctx, container, false, c)?;
        }
        for container in &pod.containers {
            check_container(fctx, container, true, c)?;
        }
        Ok(())
    }
}

impl Check for PodCheck {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn name(&self) -> &str {
        "pod"
    }

    fn run(&self, ctx: &CheckContext<'_>, collector: &mut Collector) -> crate::Result<()> {
        let accounts_loaded = ctx.txn.is_loaded(&self.accounts)?;
        for pod in ctx.txn.scan_as::<Pod>(&self.kind)? {
            let fctx =
                FindingContext::from_record(&self.kind, pod).with_containers(pod.container_names());
            inspect(collector, &fctx, |c| {
                self.check_pod(ctx, pod, &fctx, c, accounts_loaded)
            });
        }
        Ok(())
    }
}

fn check_container(
    fctx: &FindingContext,
    container: &Container,
    long_running: bool,
    c: &mut Collector,
) -> crate::Result<()> {
    let group = container.name.as_str();

    if !container.is_digest_pinned() {
        match container.image_tag() {
            None => {
                c.add_sub_code(fctx, 100u32, group, &[])?;
            }
            Some("latest") => {
                c.add_sub_code(fctx, 101u32, group, &[])?;
            }
            Some(_) => {}
        }
    }

    // Init containers run to completion; probes do not apply.
    if long_running {
        let probe = match (&container.liveness_probe, &container.readiness_probe) {
            (None, None) => Some(102u32),
            (None, Some(_)) => Some(103),
            (Some(_), None) => Some(104),
            (Some(_), Some(_)) => None,
        };
        if let Some(code) = probe {
            c.add_sub_code(fctx, code, group, &[])?;
        }
    }

    let resources = &container.resources;
    if resources.requests.is_empty() && resources.limits.is_empty() {
        c.add_sub_code(fctx, 106u32, group, &[])?;
        return Ok(());
    }
    if resources.limits.is_empty() {
        c.add_sub_code(fctx, 107u32, group, &[])?;
        return Ok(());
    }

    for (resource, parse, code) in RATIOS {
        let (Some(request), Some(limit)) = (
            resources.requests.get(resource),
            resources.limits.get(resource),
        ) else {
            continue;
        };
        let bad_shape = |err: QuantityError| SanityError::UnexpectedShape {
            fqn: fctx.fqn.to_string(),
            message: format!("container {group}: {resource} {err}"),
        };
        if parse(request).map_err(bad_shape)? > parse(limit).map_err(bad_shape)? {
            c.add_sub_code(fctx, code, group, &[request, limit])?;
        }
    }
    Ok(())
}
