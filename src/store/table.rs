//! One kind's records, indexed by FQN and by namespace.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::model::{Record, Resource};
use crate::types::Fqn;

#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    records: BTreeMap<Fqn, Arc<Resource>>,
    by_namespace: BTreeMap<String, BTreeSet<Fqn>>,
    loaded: bool,
}

impl Table {
    /// Insert or replace the record stored under its FQN. The namespace is
    /// part of the FQN, so a replacement never moves between index buckets.
    pub(crate) fn insert(&mut self, resource: Resource) -> bool {
        let fqn = resource.fqn();
        let namespace = resource.namespace().to_string();
        let replaced = self.records.insert(fqn.clone(), Arc::new(resource));
        self.by_namespace.entry(namespace).or_default().insert(fqn);
        replaced.is_some()
    }

    pub(crate) fn get(&self, fqn: &str) -> Option<&Resource> {
        self.records.get(fqn).map(Arc::as_ref)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.records.values().map(Arc::as_ref)
    }

    pub(crate) fn iter_namespace<'a>(
        &'a self,
        namespace: &str,
    ) -> impl Iterator<Item = &'a Resource> + use<'a> {
        self.by_namespace
            .get(namespace)
            .into_iter()
            .flatten()
            .filter_map(|fqn| self.records.get(fqn).map(Arc::as_ref))
    }

    pub(crate) fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.by_namespace.keys().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}
