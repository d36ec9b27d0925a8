//! The kind glossary.
//!
//! A [`KindRegistry`] is built once at startup and handed by reference to
//! the store and to checks. Nothing mutates it afterwards.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::ResourceKind;

/// Table names of the builtin kinds.
pub mod kinds {
    pub const PODS: &str = "pods";
    pub const SERVICES: &str = "services";
    pub const DEPLOYMENTS: &str = "deployments";
    pub const REPLICA_SETS: &str = "replicasets";
    pub const NETWORK_POLICIES: &str = "networkpolicies";
    pub const NAMESPACES: &str = "namespaces";
    pub const SERVICE_ACCOUNTS: &str = "serviceaccounts";
    pub const ROLE_BINDINGS: &str = "rolebindings";
    pub const CLUSTER_ROLE_BINDINGS: &str = "clusterrolebindings";

    pub const BUILTIN: [&str; 9] = [
        PODS,
        SERVICES,
        DEPLOYMENTS,
        REPLICA_SETS,
        NETWORK_POLICIES,
        NAMESPACES,
        SERVICE_ACCOUNTS,
        ROLE_BINDINGS,
        CLUSTER_ROLE_BINDINGS,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindRegistry {
    kinds: BTreeSet<ResourceKind>,
    /// Owner-reference kind (`ReplicaSet`) to table kind (`replicasets`).
    owner_aliases: BTreeMap<String, ResourceKind>,
}

impl KindRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every builtin kind, with owner aliases for the controller kinds.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in kinds::BUILTIN {
            registry = registry.with_kind(kind);
        }
        registry
            .with_owner_alias("Pod", kinds::PODS)
            .with_owner_alias("ReplicaSet", kinds::REPLICA_SETS)
            .with_owner_alias("Deployment", kinds::DEPLOYMENTS)
    }

    pub fn with_kind(mut self, kind: impl Into<ResourceKind>) -> Self {
        self.kinds.insert(kind.into());
        self
    }

    pub fn with_owner_alias(mut self, owner_kind: &str, kind: impl Into<ResourceKind>) -> Self {
        self.owner_aliases.insert(owner_kind.to_string(), kind.into());
        self
    }

    pub fn contains(&self, kind: &ResourceKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Registered kinds in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Table kind for an owner reference kind, if that table is registered.
    pub fn kind_for_owner(&self, owner_kind: &str) -> Option<&ResourceKind> {
        self.owner_aliases
            .get(owner_kind)
            .filter(|kind| self.kinds.contains(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = KindRegistry::builtin();
        assert_eq!(registry.len(), kinds::BUILTIN.len());
        assert!(registry.contains(&ResourceKind::new("pods")));
        assert!(!registry.contains(&ResourceKind::new("widgets")));
    }

    #[test]
    fn test_custom_kind_registration() {
        let registry = KindRegistry::new().with_kind("certificates");
        assert!(registry.contains(&ResourceKind::new("certificates")));
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn test_owner_alias_requires_registered_table() {
        let registry = KindRegistry::builtin();
        assert_eq!(
            registry.kind_for_owner("ReplicaSet"),
            Some(&ResourceKind::new("replicasets"))
        );
        assert_eq!(registry.kind_for_owner("Job"), None);

        let partial = KindRegistry::new()
            .with_kind("pods")
            .with_owner_alias("ReplicaSet", "replicasets");
        assert_eq!(partial.kind_for_owner("ReplicaSet"), None);
    }

    #[test]
    fn test_isolated_instances() {
        let a = KindRegistry::new().with_kind("pods");
        let b = KindRegistry::new().with_kind("services");
        assert!(!a.contains(&ResourceKind::new("services")));
        assert!(!b.contains(&ResourceKind::new("pods")));
    }
}
