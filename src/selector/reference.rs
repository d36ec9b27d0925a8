//! Cross-object reference resolution over a read transaction.

use crate::model::{OwnerReference, Record, Resource};
use crate::store::{ReadTxn, StoreError};
use crate::types::{Fqn, ResourceKind};

use super::labels::{LabelSelector, match_selector};

/// Namespaces owned by the control plane.
const SYSTEM_NAMESPACES: [&str; 3] = ["kube-system", "kube-public", "kube-node-lease"];

/// Join a namespace and name into an FQN.
pub fn fqn(namespace: &str, name: &str) -> Fqn {
    Fqn::from_parts(namespace, name)
}

/// Split a raw FQN into `(namespace, name)`.
pub fn split_fqn(raw: &str) -> (&str, &str) {
    raw.split_once('/').unwrap_or(("", raw))
}

pub fn namespace_of(raw: &str) -> &str {
    split_fqn(raw).0
}

pub fn is_system_namespace(namespace: &str) -> bool {
    SYSTEM_NAMESPACES.contains(&namespace)
}

/// Records of `kind` in `namespace` selected by `selector`. An empty
/// selector selects nothing.
pub fn find_by_namespace_and_selector<'t>(
    txn: &'t ReadTxn,
    kind: &ResourceKind,
    namespace: &str,
    selector: &LabelSelector,
) -> Result<Vec<&'t Resource>, StoreError> {
    Ok(txn
        .scan_namespace(kind, namespace)?
        .filter(|record| match_selector(record.labels(), selector))
        .collect())
}

/// Records of `kind` in `namespace` covered by `selector`. An empty
/// selector covers everything in the namespace.
pub fn find_by_namespace_covering<'t>(
    txn: &'t ReadTxn,
    kind: &ResourceKind,
    namespace: &str,
    selector: &LabelSelector,
) -> Result<Vec<&'t Resource>, StoreError> {
    Ok(txn
        .scan_namespace(kind, namespace)?
        .filter(|record| selector.covers(record.labels()))
        .collect())
}

/// Namespaces whose own labels are covered by `selector`.
pub fn find_namespaces<'t>(
    txn: &'t ReadTxn,
    namespaces_kind: &ResourceKind,
    selector: &LabelSelector,
) -> Result<Vec<&'t Resource>, StoreError> {
    Ok(txn
        .scan(namespaces_kind)?
        .filter(|ns| selector.covers(ns.labels()))
        .collect())
}

/// Result of following an owner reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OwnerLookup<'t> {
    Found(&'t Resource),
    /// The owner's kind is tracked but no such object exists.
    Missing,
    /// The owner's kind has no table, or its table was never loaded.
    Untracked,
}

/// Follow `owner` from an object living in `namespace`.
pub fn resolve_owner<'t>(
    txn: &'t ReadTxn,
    namespace: &str,
    owner: &OwnerReference,
) -> Result<OwnerLookup<'t>, StoreError> {
    let Some(kind) = txn.registry().kind_for_owner(&owner.kind) else {
        return Ok(OwnerLookup::Untracked);
    };
    if !txn.is_loaded(kind)? {
        return Ok(OwnerLookup::Untracked);
    }
    let key = fqn(namespace, &owner.name);
    Ok(match txn.get(kind, key.as_str())? {
        Some(record) => OwnerLookup::Found(record),
        None => OwnerLookup::Missing,
    })
}
